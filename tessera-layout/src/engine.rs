use taffy::prelude::{
    AlignItems, AlignSelf, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage,
    Size, TaffyMaxContent,
};
use taffy::{NodeId, Style, TaffyError, TaffyTree};
use tessera_core::{AxisAlign, AxisSizing, FrameProps, LayoutMode, Rect, TextNode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Taffy error: {0}")]
    Taffy(#[from] TaffyError),
}

/// Auto layout for frame containers, backed by Taffy flexbox.
///
/// A frame with a layout mode becomes a flex container (column for
/// vertical, row for horizontal); each text line is a leaf whose main-axis
/// size is `line_height × line_count`. Auto-sized axes shrink-wrap their
/// children plus padding and item spacing.
#[derive(Debug, Default)]
pub struct AutoLayout {
    passes: u64,
}

impl AutoLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layout passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Compute the bounds a frame takes with `children` inside it.
    ///
    /// Frames without a layout mode keep their explicit size.
    pub fn measure(&mut self, props: &FrameProps, children: &[TextNode]) -> Result<Rect, LayoutError> {
        if props.layout_mode == LayoutMode::None {
            return Ok(Rect {
                x: props.x,
                y: props.y,
                width: props.width,
                height: props.height,
            });
        }

        let mut taffy: TaffyTree<()> = TaffyTree::new();
        let leaves = children
            .iter()
            .map(|child| taffy.new_leaf(Self::line_style(child)))
            .collect::<Result<Vec<NodeId>, TaffyError>>()?;

        let root = taffy.new_with_children(Self::frame_style(props), &leaves)?;
        taffy.compute_layout(root, Size::MAX_CONTENT)?;
        let size = taffy.layout(root)?.size;
        self.passes += 1;

        log::trace!(
            "AutoLayout: {} children -> {}x{}",
            children.len(),
            size.width,
            size.height
        );

        Ok(Rect {
            x: props.x,
            y: props.y,
            width: size.width,
            height: size.height,
        })
    }

    // ---------------------------------------------------------------
    // Style helpers
    // ---------------------------------------------------------------

    fn frame_style(props: &FrameProps) -> Style {
        let vertical = props.layout_mode == LayoutMode::Vertical;
        let sized = |sizing: AxisSizing, value: f32| match sizing {
            AxisSizing::Fixed => Dimension::length(value),
            AxisSizing::Auto => Dimension::auto(),
        };

        let (width, height) = if vertical {
            (
                sized(props.counter_sizing, props.width),
                sized(props.primary_sizing, props.height),
            )
        } else {
            (
                sized(props.primary_sizing, props.width),
                sized(props.counter_sizing, props.height),
            )
        };

        let spacing = LengthPercentage::length(props.item_spacing);
        let gap = if vertical {
            Size {
                width: LengthPercentage::length(0.0),
                height: spacing,
            }
        } else {
            Size {
                width: spacing,
                height: LengthPercentage::length(0.0),
            }
        };

        Style {
            display: Display::Flex,
            flex_direction: if vertical {
                FlexDirection::Column
            } else {
                FlexDirection::Row
            },
            size: Size { width, height },
            padding: taffy::Rect {
                left: LengthPercentage::length(props.padding.left),
                right: LengthPercentage::length(props.padding.right),
                top: LengthPercentage::length(props.padding.top),
                bottom: LengthPercentage::length(props.padding.bottom),
            },
            gap,
            align_items: Some(match props.counter_align {
                AxisAlign::Min => AlignItems::FlexStart,
                AxisAlign::Center => AlignItems::Center,
                AxisAlign::Max => AlignItems::FlexEnd,
            }),
            justify_content: Some(match props.primary_align {
                AxisAlign::Min => JustifyContent::FlexStart,
                AxisAlign::Center => JustifyContent::Center,
                AxisAlign::Max => JustifyContent::FlexEnd,
            }),
            ..Style::default()
        }
    }

    /// Text lines stretch across the counter axis and are one line box
    /// tall per rendered line.
    fn line_style(line: &TextNode) -> Style {
        Style {
            size: Size {
                width: Dimension::auto(),
                height: Dimension::length(line.style.line_height * line.line_count() as f32),
            },
            align_self: Some(AlignSelf::Stretch),
            flex_shrink: 0.0,
            ..Style::default()
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
