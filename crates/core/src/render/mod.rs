//! Block renderer: a pure mapping from a block to a view tree.
//!
//! Dispatch is on the block's kind. Container kinds recurse through
//! [`render_blocks`] with the same [`RenderMode`]. A block whose type is not
//! recognized renders as a visible placeholder instead of failing the page.

mod blocks;
pub mod node;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockContent};
pub use node::{Element, RenderNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Public,
    Editing,
}

impl RenderMode {
    pub fn is_editing(self) -> bool {
        self == RenderMode::Editing
    }
}

/// Render one block. Hidden blocks produce nothing in public mode and are
/// marked `block-hidden` in editing mode.
pub fn render(block: &Block, mode: RenderMode) -> RenderNode {
    if !block.is_visible() && !mode.is_editing() {
        return RenderNode::empty();
    }

    let inner = match &block.content {
        BlockContent::Hero(c) => blocks::hero(c),
        BlockContent::Heading(c) => blocks::heading(c),
        BlockContent::Paragraph(c) => blocks::paragraph(c),
        BlockContent::RichText(c) => blocks::rich_text(c),
        BlockContent::Quote(c) => blocks::quote(c),
        BlockContent::Cta(c) => blocks::cta(c),
        BlockContent::Image(c) => blocks::image(c, mode),
        BlockContent::Gallery(c) => blocks::gallery(c),
        BlockContent::Video(c) => blocks::video(c, mode),
        BlockContent::Carousel(c) => blocks::carousel(c, mode),
        BlockContent::TwoColumn(c) => blocks::two_column(c, mode),
        BlockContent::ThreeColumn(c) => blocks::three_column(c, mode),
        BlockContent::CardGrid(c) => blocks::card_grid(c, mode),
        BlockContent::Accordion(c) => blocks::accordion(c, mode),
        BlockContent::Tabs(c) => blocks::tabs(c, mode),
        BlockContent::Table(c) => blocks::table(c),
        BlockContent::Statistics(c) => blocks::statistics(c),
        BlockContent::Timeline(c) => blocks::timeline(c),
        BlockContent::ContactForm(c) => blocks::contact_form(c, mode),
        BlockContent::Embed(c) => blocks::embed(c, mode),
        BlockContent::Unknown(unknown) => blocks::unknown(&unknown.type_name),
    };

    let mut class = format!("block block-{}", block.content.type_name());
    if !block.is_visible() {
        class.push_str(" block-hidden");
    }
    let mut wrapper = Element::new("div")
        .class(class)
        .attr("data-block-id", block.id.as_str());
    if let Some(css) = block.styles.as_ref().map(|s| s.to_css()) {
        if !css.is_empty() {
            wrapper = wrapper.attr("style", css);
        }
    }
    wrapper.child(inner).into()
}

/// Render a sibling sequence in order.
pub fn render_blocks(blocks: &[Block], mode: RenderMode) -> Vec<RenderNode> {
    blocks
        .iter()
        .map(|block| render(block, mode))
        .filter(|node| !matches!(node, RenderNode::Fragment { children } if children.is_empty()))
        .collect()
}

/// Render a whole page body.
pub fn render_page(blocks: &[Block], mode: RenderMode) -> RenderNode {
    Element::new("main")
        .class("page-content")
        .children(render_blocks(blocks, mode))
        .into()
}
