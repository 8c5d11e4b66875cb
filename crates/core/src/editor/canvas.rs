use crate::block::Block;
use crate::render::{render, Element, RenderMode, RenderNode};

use super::drag::DragController;
use super::state::EditorState;

const BLOCK_ACTIONS: [(&str, &str); 4] = [
    ("configure", "Configure"),
    ("duplicate", "Duplicate"),
    ("toggle-visibility", "Toggle visibility"),
    ("delete", "Delete"),
];

fn chrome(block: &Block, selected: bool) -> RenderNode {
    let mut class = String::from("canvas-item");
    if selected {
        class.push_str(" selected");
    }
    let toolbar = Element::new("div")
        .class("canvas-toolbar")
        .child(
            Element::new("button")
                .class("drag-handle")
                .attr("aria-label", "Drag to reorder"),
        )
        .child(
            Element::new("span")
                .class("block-label")
                .text(block.kind().map_or("Unknown", |kind| kind.label())),
        )
        .children(BLOCK_ACTIONS.iter().map(|(action, label)| {
            Element::new("button")
                .attr("data-action", *action)
                .attr("data-block-id", block.id.as_str())
                .text(*label)
                .into()
        }));
    Element::new("div")
        .class(class)
        .attr("data-block-id", block.id.as_str())
        .child(toolbar)
        .child(render(block, RenderMode::Editing))
        .into()
}

fn dragging_placeholder(block: &Block) -> RenderNode {
    Element::new("div")
        .class("canvas-item dragging")
        .attr("data-block-id", block.id.as_str())
        .text("Dragging…")
        .into()
}

/// The editor canvas: every top-level block in editing mode, wrapped in its
/// toolbar, with the dragged block replaced by a light placeholder.
pub fn render_canvas(editor: &EditorState, drag: &DragController) -> RenderNode {
    if editor.is_empty() {
        return Element::new("div")
            .class("canvas empty")
            .child(
                Element::new("p")
                    .class("empty-hint")
                    .text("Add a block from the palette to get started"),
            )
            .into();
    }
    let selected = editor.selected();
    Element::new("div")
        .class("canvas")
        .children(editor.blocks().iter().map(|block| {
            if drag.is_dragging(&block.id) {
                dragging_placeholder(block)
            } else {
                chrome(block, selected == Some(&block.id))
            }
        }))
        .into()
}
