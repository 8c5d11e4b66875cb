use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Discriminant of a block. The closed set of kinds the palette offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Hero,
    Heading,
    Paragraph,
    RichText,
    Quote,
    Cta,
    Image,
    Gallery,
    Video,
    Carousel,
    TwoColumn,
    ThreeColumn,
    CardGrid,
    Accordion,
    Tabs,
    Table,
    Statistics,
    Timeline,
    ContactForm,
    Embed,
}

impl BlockKind {
    pub const ALL: [BlockKind; 20] = [
        BlockKind::Hero,
        BlockKind::Heading,
        BlockKind::Paragraph,
        BlockKind::RichText,
        BlockKind::Quote,
        BlockKind::Cta,
        BlockKind::Image,
        BlockKind::Gallery,
        BlockKind::Video,
        BlockKind::Carousel,
        BlockKind::TwoColumn,
        BlockKind::ThreeColumn,
        BlockKind::CardGrid,
        BlockKind::Accordion,
        BlockKind::Tabs,
        BlockKind::Table,
        BlockKind::Statistics,
        BlockKind::Timeline,
        BlockKind::ContactForm,
        BlockKind::Embed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::RichText => "rich_text",
            BlockKind::Quote => "quote",
            BlockKind::Cta => "cta",
            BlockKind::Image => "image",
            BlockKind::Gallery => "gallery",
            BlockKind::Video => "video",
            BlockKind::Carousel => "carousel",
            BlockKind::TwoColumn => "two_column",
            BlockKind::ThreeColumn => "three_column",
            BlockKind::CardGrid => "card_grid",
            BlockKind::Accordion => "accordion",
            BlockKind::Tabs => "tabs",
            BlockKind::Table => "table",
            BlockKind::Statistics => "statistics",
            BlockKind::Timeline => "timeline",
            BlockKind::ContactForm => "contact_form",
            BlockKind::Embed => "embed",
        }
    }

    /// Human-readable name shown in the block palette.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Hero => "Hero",
            BlockKind::Heading => "Heading",
            BlockKind::Paragraph => "Paragraph",
            BlockKind::RichText => "Rich text",
            BlockKind::Quote => "Quote",
            BlockKind::Cta => "Call to action",
            BlockKind::Image => "Image",
            BlockKind::Gallery => "Gallery",
            BlockKind::Video => "Video",
            BlockKind::Carousel => "Carousel",
            BlockKind::TwoColumn => "Two columns",
            BlockKind::ThreeColumn => "Three columns",
            BlockKind::CardGrid => "Card grid",
            BlockKind::Accordion => "Accordion",
            BlockKind::Tabs => "Tabs",
            BlockKind::Table => "Table",
            BlockKind::Statistics => "Statistics",
            BlockKind::Timeline => "Timeline",
            BlockKind::ContactForm => "Contact form",
            BlockKind::Embed => "Embed",
        }
    }

    /// Kinds whose config owns nested block sequences.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            BlockKind::TwoColumn
                | BlockKind::ThreeColumn
                | BlockKind::CardGrid
                | BlockKind::Accordion
                | BlockKind::Tabs
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown block type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_name_matches_as_str() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("marquee".parse::<BlockKind>().is_err());
    }

    #[test]
    fn containers() {
        assert!(BlockKind::TwoColumn.is_container());
        assert!(BlockKind::Tabs.is_container());
        assert!(!BlockKind::Hero.is_container());
    }
}
