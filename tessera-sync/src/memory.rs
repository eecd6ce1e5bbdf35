//! In-memory [`Canvas`] over a [`Document`].
//!
//! Frames are re-measured with [`AutoLayout`] after every change to their
//! properties or lines. With a font guard attached, text edits are refused
//! unless the font was loaded first, the same rule a real host enforces.

use tessera_core::canvas::SIGNATURE_KEY;
use tessera_core::{
    Canvas, CanvasError, Document, FrameNode, FrameProps, NodeId, Page, Rect, TextNode, TextStyle,
};
use tessera_layout::AutoLayout;
use tessera_text::LoadedFonts;

#[derive(Debug, Default)]
pub struct MemoryCanvas {
    document: Document,
    layout: AutoLayout,
    font_guard: Option<LoadedFonts>,
    node_mutations: u64,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Refuse text edits whose font is not in `loaded`.
    pub fn with_font_guard(mut self, loaded: LoadedFonts) -> Self {
        self.font_guard = Some(loaded);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Writes to frames and text lines so far (page operations excluded).
    pub fn node_mutations(&self) -> u64 {
        self.node_mutations
    }

    /// Frame called `name` on the page called `page`.
    pub fn frame(&self, page: &str, name: &str) -> Option<&FrameNode> {
        self.document.page_named(page)?.frame_named(name)
    }

    fn frame_ref(&self, id: NodeId) -> Result<&FrameNode, CanvasError> {
        self.document.frame(id).ok_or(CanvasError::NodeNotFound(id))
    }

    fn frame_mut(&mut self, id: NodeId) -> Result<&mut FrameNode, CanvasError> {
        self.document.frame_mut(id).ok_or(CanvasError::NodeNotFound(id))
    }

    fn check_font(&self, style: &TextStyle) -> Result<(), CanvasError> {
        match &self.font_guard {
            Some(loaded) if !loaded.is_loaded(&style.font) => {
                Err(CanvasError::FontNotLoaded(style.font.clone()))
            }
            _ => Ok(()),
        }
    }

    fn relayout(layout: &mut AutoLayout, frame: &mut FrameNode) -> Result<(), CanvasError> {
        frame.bounds = layout
            .measure(&frame.props, &frame.children)
            .map_err(|e| CanvasError::Layout(e.to_string()))?;
        Ok(())
    }
}

impl Canvas for MemoryCanvas {
    fn find_page(&self, name: &str) -> Option<NodeId> {
        self.document.page_named(name).map(|p| p.id)
    }

    fn create_page(&mut self, name: &str) -> Result<NodeId, CanvasError> {
        let page = Page::new(name);
        let id = page.id;
        self.document.pages.push(page);
        Ok(id)
    }

    fn set_current_page(&mut self, page: NodeId) -> Result<(), CanvasError> {
        self.document.page(page).ok_or(CanvasError::PageNotFound(page))?;
        self.document.current_page = Some(page);
        Ok(())
    }

    fn find_container(&self, page: NodeId, name: &str) -> Option<NodeId> {
        self.document.page(page)?.frame_named(name).map(|f| f.id)
    }

    fn create_container(&mut self, page: NodeId, name: &str) -> Result<NodeId, CanvasError> {
        let page = self
            .document
            .page_mut(page)
            .ok_or(CanvasError::PageNotFound(page))?;
        let frame = FrameNode::new(name);
        let id = frame.id;
        page.frames.push(frame);
        self.node_mutations += 1;
        Ok(id)
    }

    fn configure_container(&mut self, container: NodeId, props: &FrameProps) -> Result<(), CanvasError> {
        let Self { document, layout, .. } = self;
        let frame = document
            .frame_mut(container)
            .ok_or(CanvasError::NodeNotFound(container))?;
        frame.props = props.clone();
        Self::relayout(layout, frame)?;
        self.node_mutations += 1;
        Ok(())
    }

    fn container_bounds(&self, container: NodeId) -> Result<Rect, CanvasError> {
        Ok(self.frame_ref(container)?.bounds)
    }

    fn get_signature(&self, container: NodeId) -> Result<Option<String>, CanvasError> {
        Ok(self.frame_ref(container)?.plugin_data.get(SIGNATURE_KEY).cloned())
    }

    fn set_signature(&mut self, container: NodeId, value: &str) -> Result<(), CanvasError> {
        self.frame_mut(container)?
            .plugin_data
            .insert(SIGNATURE_KEY.to_string(), value.to_string());
        self.node_mutations += 1;
        Ok(())
    }

    fn list_text_lines(&self, container: NodeId) -> Result<Vec<TextNode>, CanvasError> {
        Ok(self.frame_ref(container)?.children.clone())
    }

    fn append_text_line(
        &mut self,
        container: NodeId,
        characters: &str,
        style: &TextStyle,
    ) -> Result<NodeId, CanvasError> {
        self.check_font(style)?;
        let Self { document, layout, .. } = self;
        let frame = document
            .frame_mut(container)
            .ok_or(CanvasError::NodeNotFound(container))?;
        let line = TextNode::new(characters, style.clone());
        let id = line.id;
        frame.children.push(line);
        Self::relayout(layout, frame)?;
        self.node_mutations += 1;
        Ok(id)
    }

    fn update_text_line(
        &mut self,
        line: NodeId,
        characters: &str,
        style: &TextStyle,
    ) -> Result<(), CanvasError> {
        self.check_font(style)?;
        let Self { document, layout, .. } = self;
        let frame = document
            .frame_of_line_mut(line)
            .ok_or(CanvasError::NodeNotFound(line))?;
        if let Some(node) = frame.children.iter_mut().find(|c| c.id == line) {
            node.characters = characters.to_string();
            node.style = style.clone();
        }
        Self::relayout(layout, frame)?;
        self.node_mutations += 1;
        Ok(())
    }

    fn remove_text_line(&mut self, line: NodeId) -> Result<(), CanvasError> {
        let Self { document, layout, .. } = self;
        let frame = document
            .frame_of_line_mut(line)
            .ok_or(CanvasError::NodeNotFound(line))?;
        frame.children.retain(|c| c.id != line);
        Self::relayout(layout, frame)?;
        self.node_mutations += 1;
        Ok(())
    }
}
