//! Pointer interaction rules shared by the in-process viewer and the
//! generated page script.

use crate::config::{LayoutConfig, PageConfig};
use crate::layout::{NodeLayout, RadialLayout};
use crate::render::escape_xml;
use serde::Serialize;

pub const TOOLTIP_CLASS_LABEL: &str = "Class:";
pub const TOOLTIP_TITLE_LABEL: &str = "Title:";

/// A node together with its ancestor chain (nearest first, root last).
#[derive(Debug, Clone)]
pub struct NodeContext<'a> {
    pub node: &'a NodeLayout,
    pub ancestors: Vec<&'a NodeLayout>,
}

impl<'a> NodeContext<'a> {
    pub fn new(layout: &'a RadialLayout, index: usize) -> Option<Self> {
        let node = layout.nodes.get(index)?;
        Some(Self {
            node,
            ancestors: layout.ancestors(index),
        })
    }

    /// Name of the depth-1 ancestor, or the node itself at depth 1.
    /// Empty for the root.
    pub fn class_name(&self) -> &'a str {
        std::iter::once(self.node)
            .chain(self.ancestors.iter().copied())
            .find(|n| n.depth == 1)
            .map(|n| n.name.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub class_name: String,
    pub name: String,
    pub left: f32,
    pub top: f32,
}

impl Tooltip {
    pub fn at(context: &NodeContext<'_>, page_x: f32, page_y: f32, offset: f32) -> Self {
        Self {
            class_name: context.class_name().to_string(),
            name: context.node.name.clone(),
            left: page_x + offset,
            top: page_y + offset,
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<strong>{TOOLTIP_CLASS_LABEL}</strong> {}<br><strong>{TOOLTIP_TITLE_LABEL}</strong> {}",
            escape_xml(&self.class_name),
            escape_xml(&self.name)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub font_size: f32,
    pub underline: bool,
}

pub fn label_style(node: &NodeLayout, hovered: bool) -> LabelStyle {
    if hovered {
        LabelStyle {
            font_size: node.label.hover_font_size,
            underline: true,
        }
    } else {
        LabelStyle {
            font_size: node.label.font_size,
            underline: false,
        }
    }
}

/// Message posted to the embedding page when a node is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMessage {
    pub frame: String,
    pub target_origin: String,
    pub payload: String,
}

impl FrameMessage {
    pub fn for_click(context: &NodeContext<'_>, page: &PageConfig) -> Self {
        Self {
            frame: page.frame_name.clone(),
            target_origin: page.target_origin.clone(),
            payload: context.node.name.clone(),
        }
    }
}

/// Entrance fade applied after each draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceAnimation {
    pub duration_ms: u32,
    pub label_opacity: f32,
    pub node_opacity: f32,
}

impl EntranceAnimation {
    pub fn new(page: &PageConfig, layout: &LayoutConfig) -> Self {
        Self {
            duration_ms: page.animation_ms,
            label_opacity: 1.0,
            node_opacity: layout.node_opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { index: usize, page_x: f32, page_y: f32 },
    Leave { index: usize },
    Click { index: usize },
}

/// Receives resolved interactions; every callback carries the node context.
pub trait InteractionHandler {
    fn show_tooltip(&mut self, context: &NodeContext<'_>, tooltip: &Tooltip, style: LabelStyle);
    fn hide_tooltip(&mut self, context: &NodeContext<'_>, style: LabelStyle);
    fn post_message(&mut self, context: &NodeContext<'_>, message: &FrameMessage);
}

/// Resolves `event` against `layout` and forwards it to `handler`.
/// Events for unknown nodes are ignored.
pub fn dispatch(
    layout: &RadialLayout,
    page: &PageConfig,
    event: PointerEvent,
    handler: &mut dyn InteractionHandler,
) {
    match event {
        PointerEvent::Enter {
            index,
            page_x,
            page_y,
        } => {
            let Some(context) = NodeContext::new(layout, index) else {
                return;
            };
            let tooltip = Tooltip::at(&context, page_x, page_y, page.tooltip_offset);
            handler.show_tooltip(&context, &tooltip, label_style(context.node, true));
        }
        PointerEvent::Leave { index } => {
            let Some(context) = NodeContext::new(layout, index) else {
                return;
            };
            handler.hide_tooltip(&context, label_style(context.node, false));
        }
        PointerEvent::Click { index } => {
            let Some(context) = NodeContext::new(layout, index) else {
                return;
            };
            let message = FrameMessage::for_click(&context, page);
            log::debug!("posting {:?} to frame {}", message.payload, message.frame);
            handler.post_message(&context, &message);
        }
    }
}
