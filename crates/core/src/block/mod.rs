//! The block document model: a tagged union of block kinds, each with a typed
//! configuration payload and shared style overrides.
//!
//! Persisted shape of one block:
//!
//! ```json
//! { "id": "hero_1718000000000", "type": "hero", "order": 0,
//!   "visibility": "visible", "config": { ... }, "styles": { ... } }
//! ```

pub mod config;
pub mod id;
pub mod kind;
pub mod styles;
pub mod template;
pub mod validate;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub use config::*;
pub use id::{BlockId, BlockIdGenerator};
pub use kind::BlockKind;
pub use styles::{BlockStyles, TextAlign};
pub use validate::{check_publishable, validate_block, validate_blocks, BlockValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Visible => Visibility::Hidden,
            Visibility::Hidden => Visibility::Visible,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// A block whose `type` is not known, or whose `config` does not fit its
/// kind. Kept verbatim so a re-save does not destroy it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub type_name: String,
    pub config: Value,
    pub reason: String,
    /// The whole stored entry, when it could not be read as a block at all.
    pub raw: Option<Value>,
}

macro_rules! block_contents {
    ($($kind:ident => $config:ty),+ $(,)?) => {
        /// Kind-specific payload. The variant is the block's `type`.
        #[derive(Debug, Clone, PartialEq)]
        pub enum BlockContent {
            $($kind($config),)+
            Unknown(UnknownBlock),
        }

        impl BlockContent {
            pub fn kind(&self) -> Option<BlockKind> {
                match self {
                    $(BlockContent::$kind(_) => Some(BlockKind::$kind),)+
                    BlockContent::Unknown(_) => None,
                }
            }

            /// Decode a config payload as the given kind.
            pub fn decode(kind: BlockKind, config: Value) -> Result<Self, serde_json::Error> {
                match kind {
                    $(BlockKind::$kind => serde_json::from_value(config).map(BlockContent::$kind),)+
                }
            }

            pub fn config_value(&self) -> Result<Value, serde_json::Error> {
                match self {
                    $(BlockContent::$kind(config) => serde_json::to_value(config),)+
                    BlockContent::Unknown(unknown) => Ok(unknown.config.clone()),
                }
            }

            fn serialize_config<S: SerializeStruct>(&self, state: &mut S) -> Result<(), S::Error> {
                match self {
                    $(BlockContent::$kind(config) => state.serialize_field("config", config),)+
                    BlockContent::Unknown(unknown) => state.serialize_field("config", &unknown.config),
                }
            }
        }
    };
}

block_contents! {
    Hero => HeroConfig,
    Heading => HeadingConfig,
    Paragraph => ParagraphConfig,
    RichText => RichTextConfig,
    Quote => QuoteConfig,
    Cta => CtaConfig,
    Image => ImageConfig,
    Gallery => GalleryConfig,
    Video => VideoConfig,
    Carousel => CarouselConfig,
    TwoColumn => TwoColumnConfig,
    ThreeColumn => ThreeColumnConfig,
    CardGrid => CardGridConfig,
    Accordion => AccordionConfig,
    Tabs => TabsConfig,
    Table => TableConfig,
    Statistics => StatisticsConfig,
    Timeline => TimelineConfig,
    ContactForm => ContactFormConfig,
    Embed => EmbedConfig,
}

impl BlockContent {
    /// The `type` string written to storage.
    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unknown(unknown) => &unknown.type_name,
            known => known.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }

    /// Decode a raw `type` + `config` pair, falling back to [`UnknownBlock`].
    pub fn from_raw(type_name: &str, config: Value) -> Self {
        let kind = match type_name.parse::<BlockKind>() {
            Ok(kind) => kind,
            Err(_) => {
                return BlockContent::Unknown(UnknownBlock {
                    type_name: type_name.to_string(),
                    config,
                    reason: format!("unknown block type '{type_name}'"),
                    raw: None,
                })
            }
        };
        // A missing config means "all defaults", not a malformed block.
        let payload = match &config {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        match BlockContent::decode(kind, payload) {
            Ok(content) => content,
            Err(err) => BlockContent::Unknown(UnknownBlock {
                type_name: type_name.to_string(),
                config,
                reason: format!("invalid {type_name} config: {err}"),
                raw: None,
            }),
        }
    }

    /// Nested block sequences owned by a container kind.
    pub fn children(&self) -> Vec<&Vec<Block>> {
        match self {
            BlockContent::TwoColumn(c) => vec![&c.left, &c.right],
            BlockContent::ThreeColumn(c) => vec![&c.left, &c.center, &c.right],
            BlockContent::CardGrid(c) => c.cards.iter().map(|card| &card.blocks).collect(),
            BlockContent::Accordion(c) => c.items.iter().map(|item| &item.blocks).collect(),
            BlockContent::Tabs(c) => c.tabs.iter().map(|tab| &tab.blocks).collect(),
            _ => Vec::new(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Vec<Block>> {
        match self {
            BlockContent::TwoColumn(c) => vec![&mut c.left, &mut c.right],
            BlockContent::ThreeColumn(c) => vec![&mut c.left, &mut c.center, &mut c.right],
            BlockContent::CardGrid(c) => c.cards.iter_mut().map(|card| &mut card.blocks).collect(),
            BlockContent::Accordion(c) => {
                c.items.iter_mut().map(|item| &mut item.blocks).collect()
            }
            BlockContent::Tabs(c) => c.tabs.iter_mut().map(|tab| &mut tab.blocks).collect(),
            _ => Vec::new(),
        }
    }
}

static UNREADABLE_SEQ: AtomicU64 = AtomicU64::new(1);

/// One entry in a page's content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// Position among siblings, dense and zero-based.
    pub order: usize,
    pub visibility: Visibility,
    pub content: BlockContent,
    pub styles: Option<BlockStyles>,
}

impl Block {
    pub fn new(id: BlockId, order: usize, content: BlockContent) -> Self {
        Self {
            id,
            order,
            visibility: Visibility::Visible,
            content,
            styles: None,
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.content.kind()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// Placeholder for a stored entry whose envelope does not decode: a
    /// missing or non-string id, a bad `visibility`, a non-object entry.
    /// Whatever fields can be read are kept; the rest stays in `raw`.
    fn unreadable(value: Value, reason: String) -> Self {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(BlockId::new)
            .unwrap_or_else(|| {
                let n = UNREADABLE_SEQ.fetch_add(1, Ordering::Relaxed);
                BlockId::new(format!("unreadable_{n}"))
            });
        let type_name = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unreadable")
            .to_string();
        let order = value
            .get("order")
            .and_then(Value::as_u64)
            .and_then(|order| usize::try_from(order).ok())
            .unwrap_or_default();
        let visibility = value
            .get("visibility")
            .and_then(|v| Visibility::deserialize(v).ok())
            .unwrap_or_default();
        let config = value.get("config").cloned().unwrap_or(Value::Null);
        tracing::warn!(block_id = %id, reason = %reason, "Tolerating unreadable block");
        Block {
            id,
            order,
            visibility,
            content: BlockContent::Unknown(UnknownBlock {
                type_name,
                config,
                reason,
                raw: Some(value),
            }),
            styles: None,
        }
    }

    /// Depth-first search for a block id in this block's nested sequences.
    pub fn find_nested(&self, id: &BlockId) -> Option<&Block> {
        self.content
            .children()
            .into_iter()
            .flat_map(|seq| seq.iter())
            .find_map(|child| {
                if &child.id == id {
                    Some(child)
                } else {
                    child.find_nested(id)
                }
            })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let BlockContent::Unknown(UnknownBlock { raw: Some(raw), .. }) = &self.content {
            // Written back as stored; only the tree position is refreshed.
            return match raw {
                Value::Object(fields) => {
                    let mut fields = fields.clone();
                    fields.insert("id".into(), Value::String(self.id.to_string()));
                    fields.insert("order".into(), Value::from(self.order));
                    fields.serialize(serializer)
                }
                other => other.serialize(serializer),
            };
        }
        let mut state = serializer.serialize_struct("Block", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.type_name())?;
        state.serialize_field("order", &self.order)?;
        state.serialize_field("visibility", &self.visibility)?;
        self.content.serialize_config(&mut state)?;
        match &self.styles {
            Some(styles) => state.serialize_field("styles", styles)?,
            None => state.skip_field("styles")?,
        }
        state.end()
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    order: usize,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    config: Value,
    #[serde(default)]
    styles: Option<BlockStyles>,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let raw = match RawBlock::deserialize(&value) {
            Ok(raw) => raw,
            Err(err) => return Ok(Block::unreadable(value, err.to_string())),
        };
        let content = BlockContent::from_raw(&raw.type_name, raw.config);
        if let BlockContent::Unknown(unknown) = &content {
            tracing::warn!(block_id = %raw.id, reason = %unknown.reason, "Tolerating unrecognized block");
        }
        Ok(Block {
            id: raw.id,
            order: raw.order,
            visibility: raw.visibility,
            content,
            styles: raw.styles,
        })
    }
}

/// Renumber `order` to match position, recursively into nested sequences.
pub fn normalize_order(blocks: &mut [Block]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.order = index;
        for nested in block.content.children_mut() {
            normalize_order(nested);
        }
    }
}

/// Whether every sibling sequence has `order == position`.
pub fn is_dense(blocks: &[Block]) -> bool {
    blocks.iter().enumerate().all(|(index, block)| {
        block.order == index && block.content.children().into_iter().all(|seq| is_dense(seq))
    })
}
