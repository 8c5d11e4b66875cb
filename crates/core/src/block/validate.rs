//! Block validation at the persistence boundary.
//!
//! Two levels: [`validate_blocks`] checks the structural invariants every
//! saved draft must hold; [`check_publishable`] additionally requires the
//! content fields a public page cannot render without.
use std::collections::HashSet;

use thiserror::Error;

use super::{Block, BlockContent, BlockId};
use crate::error::CoreError;

#[derive(Debug, Error, PartialEq)]
pub enum BlockValidationError {
    #[error("block id cannot be empty")]
    EmptyId,
    #[error("duplicate block id '{0}'")]
    DuplicateId(BlockId),
    #[error("block '{id}' has order {found}, expected {expected}")]
    OrderGap {
        id: BlockId,
        found: usize,
        expected: usize,
    },
    #[error("block '{id}': {message}")]
    InvalidConfig { id: BlockId, message: String },
    #[error("block '{id}': {field} is required")]
    MissingField { id: BlockId, field: &'static str },
}

impl From<BlockValidationError> for CoreError {
    fn from(err: BlockValidationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Range checks for one block and, recursively, the sequences it contains.
pub fn validate_block(block: &Block) -> Result<(), BlockValidationError> {
    check_block(block, &mut HashSet::new())
}

/// Structural checks: non-empty ids unique across the whole tree, dense
/// order, and config values within their allowed ranges.
pub fn validate_blocks(blocks: &[Block]) -> Result<(), BlockValidationError> {
    check_sequence(blocks, &mut HashSet::new())
}

fn check_sequence<'a>(
    blocks: &'a [Block],
    seen: &mut HashSet<&'a BlockId>,
) -> Result<(), BlockValidationError> {
    for (index, block) in blocks.iter().enumerate() {
        if block.order != index {
            return Err(BlockValidationError::OrderGap {
                id: block.id.clone(),
                found: block.order,
                expected: index,
            });
        }
        check_block(block, seen)?;
    }
    Ok(())
}

fn check_block<'a>(
    block: &'a Block,
    seen: &mut HashSet<&'a BlockId>,
) -> Result<(), BlockValidationError> {
    if block.id.as_str().is_empty() {
        return Err(BlockValidationError::EmptyId);
    }
    if !seen.insert(&block.id) {
        return Err(BlockValidationError::DuplicateId(block.id.clone()));
    }
    validate_ranges(block)?;
    for nested in block.content.children() {
        check_sequence(nested, seen)?;
    }
    Ok(())
}

/// [`validate_blocks`] plus required-field checks. Unknown blocks pass;
/// they render as a placeholder.
pub fn check_publishable(blocks: &[Block]) -> Result<(), BlockValidationError> {
    validate_blocks(blocks)?;
    check_required(blocks)
}

fn check_required(blocks: &[Block]) -> Result<(), BlockValidationError> {
    for block in blocks {
        if let Some(field) = missing_field(&block.content) {
            return Err(BlockValidationError::MissingField {
                id: block.id.clone(),
                field,
            });
        }
        for nested in block.content.children() {
            check_required(nested)?;
        }
    }
    Ok(())
}

fn missing_field(content: &BlockContent) -> Option<&'static str> {
    let blank = |s: &str| s.trim().is_empty();
    match content {
        BlockContent::Hero(c) if blank(&c.title) => Some("title"),
        BlockContent::Heading(c) if blank(&c.text) => Some("text"),
        BlockContent::Image(c) if blank(&c.src) => Some("src"),
        BlockContent::Video(c) if blank(&c.url) => Some("url"),
        BlockContent::Gallery(c) if c.images.iter().any(|img| blank(&img.src)) => {
            Some("images[].src")
        }
        BlockContent::Carousel(c) if c.slides.iter().any(|s| blank(&s.image)) => {
            Some("slides[].image")
        }
        BlockContent::Tabs(c) if c.tabs.iter().any(|t| blank(&t.label)) => Some("tabs[].label"),
        BlockContent::ContactForm(c) if c.fields.iter().any(|f| blank(&f.name)) => {
            Some("fields[].name")
        }
        BlockContent::Embed(c)
            if c.url.as_deref().map_or(true, blank) && c.html.as_deref().map_or(true, blank) =>
        {
            Some("url or html")
        }
        _ => None,
    }
}

fn validate_ranges(block: &Block) -> Result<(), BlockValidationError> {
    let invalid = |message: String| BlockValidationError::InvalidConfig {
        id: block.id.clone(),
        message,
    };
    match &block.content {
        BlockContent::Heading(c) if !(1..=6).contains(&c.level) => Err(invalid(format!(
            "heading level must be between 1 and 6, got {}",
            c.level
        ))),
        BlockContent::Gallery(c) if !(1..=6).contains(&c.columns) => Err(invalid(format!(
            "gallery columns must be between 1 and 6, got {}",
            c.columns
        ))),
        BlockContent::CardGrid(c) if !(1..=6).contains(&c.columns) => Err(invalid(format!(
            "card grid columns must be between 1 and 6, got {}",
            c.columns
        ))),
        BlockContent::Statistics(c) if !(1..=6).contains(&c.columns) => Err(invalid(format!(
            "statistics columns must be between 1 and 6, got {}",
            c.columns
        ))),
        BlockContent::Tabs(c) if !c.tabs.is_empty() && c.default_tab >= c.tabs.len() => {
            Err(invalid(format!(
                "default tab {} is out of range for {} tabs",
                c.default_tab,
                c.tabs.len()
            )))
        }
        BlockContent::Table(c) => {
            match c.rows.iter().position(|row| row.len() != c.headers.len()) {
                Some(row) => Err(invalid(format!(
                    "table row {row} has {} cells, expected {}",
                    c.rows[row].len(),
                    c.headers.len()
                ))),
                None => Ok(()),
            }
        }
        BlockContent::Hero(c) => match c.background.overlay_opacity {
            Some(opacity) if !(0.0..=1.0).contains(&opacity) => Err(invalid(format!(
                "overlay opacity must be between 0 and 1, got {opacity}"
            ))),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockKind, HeadingConfig, ImageConfig, TableConfig, TextAlign};

    fn block(id: &str, order: usize, content: BlockContent) -> Block {
        Block::new(BlockId::new(id), order, content)
    }

    #[test]
    fn templates_are_structurally_valid() {
        let blocks: Vec<Block> = BlockKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| block(&format!("b{i}"), i, BlockContent::template(*kind)))
            .collect();
        assert_eq!(validate_blocks(&blocks), Ok(()));
    }

    #[test]
    fn rejects_empty_and_duplicate_ids() {
        let p = BlockContent::template(BlockKind::Paragraph);
        assert_eq!(
            validate_blocks(&[block("", 0, p.clone())]),
            Err(BlockValidationError::EmptyId)
        );
        assert_eq!(
            validate_blocks(&[block("a", 0, p.clone()), block("a", 1, p)]),
            Err(BlockValidationError::DuplicateId(BlockId::new("a")))
        );
    }

    #[test]
    fn rejects_order_gaps() {
        let p = BlockContent::template(BlockKind::Paragraph);
        let err = validate_blocks(&[block("a", 0, p.clone()), block("b", 2, p)]).unwrap_err();
        assert!(matches!(err, BlockValidationError::OrderGap { expected: 1, found: 2, .. }));
    }

    #[test]
    fn rejects_out_of_range_heading_level() {
        let heading = BlockContent::Heading(HeadingConfig {
            text: "x".into(),
            level: 7,
            alignment: TextAlign::Left,
        });
        let err = validate_blocks(&[block("h", 0, heading)]).unwrap_err();
        assert!(err.to_string().contains("heading level"));
    }

    #[test]
    fn rejects_ragged_table_rows() {
        let table = BlockContent::Table(TableConfig {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into()]],
            caption: None,
            striped: false,
        });
        let err = validate_blocks(&[block("t", 0, table)]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn empty_image_is_a_valid_draft_but_not_publishable() {
        let image = BlockContent::Image(ImageConfig {
            src: String::new(),
            alt: String::new(),
            caption: None,
            aspect_ratio: Default::default(),
            link: None,
        });
        let blocks = [block("img", 0, image)];
        assert!(validate_blocks(&blocks).is_ok());
        assert_eq!(
            check_publishable(&blocks),
            Err(BlockValidationError::MissingField {
                id: BlockId::new("img"),
                field: "src"
            })
        );
    }

    #[test]
    fn nested_sequences_are_checked() {
        let mut columns = BlockContent::template(BlockKind::TwoColumn);
        if let BlockContent::TwoColumn(cfg) = &mut columns {
            let p = BlockContent::template(BlockKind::Paragraph);
            cfg.left = vec![block("n", 0, p.clone()), block("n", 1, p)];
        }
        let err = validate_blocks(&[block("cols", 0, columns)]).unwrap_err();
        assert_eq!(err, BlockValidationError::DuplicateId(BlockId::new("n")));
    }

    #[test]
    fn ids_must_be_unique_across_containers() {
        let p = BlockContent::template(BlockKind::Paragraph);
        let mut first = BlockContent::template(BlockKind::TwoColumn);
        let mut second = first.clone();
        for columns in [&mut first, &mut second] {
            if let BlockContent::TwoColumn(cfg) = columns {
                cfg.left = vec![block("inner", 0, p.clone())];
            }
        }
        let err = validate_blocks(&[block("a", 0, first), block("b", 1, second)]).unwrap_err();
        assert_eq!(err, BlockValidationError::DuplicateId(BlockId::new("inner")));

        let mut shadowing = BlockContent::template(BlockKind::TwoColumn);
        if let BlockContent::TwoColumn(cfg) = &mut shadowing {
            cfg.right = vec![block("outer", 0, p)];
        }
        let err = validate_blocks(&[block("outer", 0, shadowing)]).unwrap_err();
        assert_eq!(err, BlockValidationError::DuplicateId(BlockId::new("outer")));
    }

    #[test]
    fn converts_into_core_validation_error() {
        let err: CoreError = BlockValidationError::EmptyId.into();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("empty")));
    }
}
