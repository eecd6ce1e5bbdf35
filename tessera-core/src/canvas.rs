//! The host canvas as seen by the reconciler.
//!
//! Every operation the frame sync performs on the document goes through
//! [`Canvas`]. Implementations own layout: after any mutation of a frame or
//! its text lines, [`Canvas::container_bounds`] must reflect the new size.

use thiserror::Error;

use crate::{FontName, FrameProps, NodeId, Rect, TextNode, TextStyle};

/// Plugin-data key holding a frame's content signature.
pub const SIGNATURE_KEY: &str = "signature";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("Page not found: {0}")]
    PageNotFound(NodeId),
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Font \"{0}\" must be loaded before editing text")]
    FontNotLoaded(FontName),
    #[error("Layout failed: {0}")]
    Layout(String),
}

/// Mutable design document hosting pages of frame containers.
///
/// Lookups return `None` when nothing matches; mutations return
/// [`CanvasError`] when the host refuses them.
pub trait Canvas {
    /// Top-level page called `name`.
    fn find_page(&self, name: &str) -> Option<NodeId>;

    fn create_page(&mut self, name: &str) -> Result<NodeId, CanvasError>;

    fn set_current_page(&mut self, page: NodeId) -> Result<(), CanvasError>;

    /// Frame container called `name` directly on `page`.
    fn find_container(&self, page: NodeId, name: &str) -> Option<NodeId>;

    /// Create an empty frame called `name` at the end of `page`.
    fn create_container(&mut self, page: NodeId, name: &str) -> Result<NodeId, CanvasError>;

    /// Apply layout, paint and position to a frame.
    fn configure_container(&mut self, container: NodeId, props: &FrameProps) -> Result<(), CanvasError>;

    /// Current bounds of a frame, after auto layout.
    fn container_bounds(&self, container: NodeId) -> Result<Rect, CanvasError>;

    fn get_signature(&self, container: NodeId) -> Result<Option<String>, CanvasError>;

    fn set_signature(&mut self, container: NodeId, value: &str) -> Result<(), CanvasError>;

    /// Text lines of a frame in display order.
    fn list_text_lines(&self, container: NodeId) -> Result<Vec<TextNode>, CanvasError>;

    /// Append a text line; its font must already be loaded.
    fn append_text_line(
        &mut self,
        container: NodeId,
        characters: &str,
        style: &TextStyle,
    ) -> Result<NodeId, CanvasError>;

    /// Replace content and style of an existing line; its font must already be loaded.
    fn update_text_line(
        &mut self,
        line: NodeId,
        characters: &str,
        style: &TextStyle,
    ) -> Result<(), CanvasError>;

    fn remove_text_line(&mut self, line: NodeId) -> Result<(), CanvasError>;
}
