//! Configuration panels.
//!
//! Each block kind has one panel: a fixed list of fields bound to keys of
//! that kind's config. A panel view is rebuilt from the selected block every
//! time it is requested, so switching blocks never carries field values
//! across. The style panel is identical for every kind.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::block::{BlockId, BlockKind, BlockStyles, TextAlign};
use crate::error::CoreError;

use super::command::{BlockPatch, BlockUpdate};
use super::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "input", rename_all = "camelCase")]
pub enum FieldInput {
    Text,
    TextArea,
    Html,
    Url,
    Number { min: i64, max: i64 },
    Toggle,
    Select { options: &'static [&'static str] },
    /// A nested object edited as a unit (e.g. the hero background).
    Group,
    /// A repeatable list of items.
    List,
    /// A nested block sequence; shown read-only in the panel.
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub input: FieldInput,
}

const fn field(key: &'static str, label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec { key, label, input }
}

const ALIGN: FieldInput = FieldInput::Select {
    options: &["left", "center", "right", "justify"],
};
const ASPECT: FieldInput = FieldInput::Select {
    options: &["16/9", "4/3", "1/1", "auto"],
};
const COLUMNS: FieldInput = FieldInput::Number { min: 1, max: 6 };

const HERO: &[FieldSpec] = &[
    field("title", "Title", FieldInput::Text),
    field("subtitle", "Subtitle", FieldInput::TextArea),
    field("background", "Background", FieldInput::Group),
    field("buttons", "Buttons", FieldInput::List),
    field("alignment", "Alignment", ALIGN),
    field("minHeight", "Minimum height", FieldInput::Text),
];
const HEADING: &[FieldSpec] = &[
    field("text", "Text", FieldInput::Text),
    field("level", "Level", FieldInput::Number { min: 1, max: 6 }),
    field("alignment", "Alignment", ALIGN),
];
const PARAGRAPH: &[FieldSpec] = &[
    field("text", "Text", FieldInput::TextArea),
    field("alignment", "Alignment", ALIGN),
];
const RICH_TEXT: &[FieldSpec] = &[field("html", "Content", FieldInput::Html)];
const QUOTE: &[FieldSpec] = &[
    field("text", "Quote", FieldInput::TextArea),
    field("author", "Author", FieldInput::Text),
    field("role", "Role", FieldInput::Text),
    field("avatarUrl", "Avatar", FieldInput::Url),
];
const CTA: &[FieldSpec] = &[
    field("title", "Title", FieldInput::Text),
    field("description", "Description", FieldInput::TextArea),
    field("buttons", "Buttons", FieldInput::List),
];
const IMAGE: &[FieldSpec] = &[
    field("src", "Image", FieldInput::Url),
    field("alt", "Alt text", FieldInput::Text),
    field("caption", "Caption", FieldInput::Text),
    field("aspectRatio", "Aspect ratio", ASPECT),
    field("link", "Link", FieldInput::Url),
];
const GALLERY: &[FieldSpec] = &[
    field("images", "Images", FieldInput::List),
    field("columns", "Columns", COLUMNS),
    field("aspectRatio", "Aspect ratio", ASPECT),
];
const VIDEO: &[FieldSpec] = &[
    field("url", "Video URL", FieldInput::Url),
    field(
        "provider",
        "Provider",
        FieldInput::Select {
            options: &["youtube", "vimeo", "file"],
        },
    ),
    field("autoplay", "Autoplay", FieldInput::Toggle),
    field("aspectRatio", "Aspect ratio", ASPECT),
    field("poster", "Poster image", FieldInput::Url),
];
const CAROUSEL: &[FieldSpec] = &[
    field("slides", "Slides", FieldInput::List),
    field("autoplay", "Autoplay", FieldInput::Toggle),
    field(
        "intervalMs",
        "Interval (ms)",
        FieldInput::Number {
            min: 1000,
            max: 60000,
        },
    ),
    field("showIndicators", "Show indicators", FieldInput::Toggle),
];
const TWO_COLUMN: &[FieldSpec] = &[
    field("left", "Left column", FieldInput::Blocks),
    field("right", "Right column", FieldInput::Blocks),
    field(
        "ratio",
        "Column ratio",
        FieldInput::Select {
            options: &["50-50", "60-40", "40-60", "70-30", "30-70"],
        },
    ),
    field("gap", "Gap", FieldInput::Text),
];
const THREE_COLUMN: &[FieldSpec] = &[
    field("left", "Left column", FieldInput::Blocks),
    field("center", "Center column", FieldInput::Blocks),
    field("right", "Right column", FieldInput::Blocks),
    field("gap", "Gap", FieldInput::Text),
];
const CARD_GRID: &[FieldSpec] = &[
    field("cards", "Cards", FieldInput::List),
    field("columns", "Columns", COLUMNS),
];
const ACCORDION: &[FieldSpec] = &[
    field("items", "Items", FieldInput::List),
    field("allowMultiple", "Allow multiple open", FieldInput::Toggle),
];
const TABS: &[FieldSpec] = &[
    field("tabs", "Tabs", FieldInput::List),
    field("defaultTab", "Default tab", FieldInput::Number { min: 0, max: 20 }),
];
const TABLE: &[FieldSpec] = &[
    field("headers", "Headers", FieldInput::List),
    field("rows", "Rows", FieldInput::List),
    field("caption", "Caption", FieldInput::Text),
    field("striped", "Striped rows", FieldInput::Toggle),
];
const STATISTICS: &[FieldSpec] = &[
    field("items", "Statistics", FieldInput::List),
    field("columns", "Columns", COLUMNS),
];
const TIMELINE: &[FieldSpec] = &[field("items", "Events", FieldInput::List)];
const CONTACT_FORM: &[FieldSpec] = &[
    field("title", "Title", FieldInput::Text),
    field("fields", "Fields", FieldInput::List),
    field("submitLabel", "Submit label", FieldInput::Text),
    field("recipientEmail", "Recipient email", FieldInput::Text),
    field("successMessage", "Success message", FieldInput::TextArea),
];
const EMBED: &[FieldSpec] = &[
    field("url", "URL", FieldInput::Url),
    field("html", "Embed code", FieldInput::Html),
    field("height", "Height", FieldInput::Number { min: 50, max: 4000 }),
    field("title", "Title", FieldInput::Text),
];

/// The panel for a block kind.
pub fn panel_fields(kind: BlockKind) -> &'static [FieldSpec] {
    match kind {
        BlockKind::Hero => HERO,
        BlockKind::Heading => HEADING,
        BlockKind::Paragraph => PARAGRAPH,
        BlockKind::RichText => RICH_TEXT,
        BlockKind::Quote => QUOTE,
        BlockKind::Cta => CTA,
        BlockKind::Image => IMAGE,
        BlockKind::Gallery => GALLERY,
        BlockKind::Video => VIDEO,
        BlockKind::Carousel => CAROUSEL,
        BlockKind::TwoColumn => TWO_COLUMN,
        BlockKind::ThreeColumn => THREE_COLUMN,
        BlockKind::CardGrid => CARD_GRID,
        BlockKind::Accordion => ACCORDION,
        BlockKind::Tabs => TABS,
        BlockKind::Table => TABLE,
        BlockKind::Statistics => STATISTICS,
        BlockKind::Timeline => TIMELINE,
        BlockKind::ContactForm => CONTACT_FORM,
        BlockKind::Embed => EMBED,
    }
}

/// Fields of the shared style panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleField {
    BackgroundColor,
    TextColor,
    Padding,
    Margin,
    FontFamily,
    FontSize,
    FontWeight,
    TextAlign,
    MaxWidth,
    BorderRadius,
}

impl StyleField {
    pub const ALL: [StyleField; 10] = [
        StyleField::BackgroundColor,
        StyleField::TextColor,
        StyleField::Padding,
        StyleField::Margin,
        StyleField::FontFamily,
        StyleField::FontSize,
        StyleField::FontWeight,
        StyleField::TextAlign,
        StyleField::MaxWidth,
        StyleField::BorderRadius,
    ];

    /// Set or clear this field on `styles`.
    pub fn apply(self, styles: &mut BlockStyles, value: Option<&str>) -> Result<(), CoreError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let slot = match self {
            StyleField::BackgroundColor => &mut styles.background_color,
            StyleField::TextColor => &mut styles.text_color,
            StyleField::Padding => &mut styles.padding,
            StyleField::Margin => &mut styles.margin,
            StyleField::FontFamily => &mut styles.font_family,
            StyleField::FontSize => &mut styles.font_size,
            StyleField::FontWeight => &mut styles.font_weight,
            StyleField::MaxWidth => &mut styles.max_width,
            StyleField::BorderRadius => &mut styles.border_radius,
            StyleField::TextAlign => {
                styles.text_align = match value {
                    None => None,
                    Some(v) => Some(serde_json::from_value::<TextAlign>(Value::String(
                        v.to_string(),
                    ))
                    .map_err(|_| CoreError::Validation(format!("invalid text alignment '{v}'")))?),
                };
                return Ok(());
            }
        };
        *slot = value.map(str::to_string);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelField {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: Value,
}

/// What the configuration sidebar shows for the selected block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub block_id: BlockId,
    pub type_name: String,
    pub title: &'static str,
    /// False for unrecognized blocks, which only get a notice.
    pub editable: bool,
    pub fields: Vec<PanelField>,
    pub styles: BlockStyles,
}

impl EditorState {
    /// Select a block and return its freshly loaded panel.
    pub fn open_panel(&mut self, id: &BlockId) -> Option<PanelView> {
        if !self.select(id) {
            return None;
        }
        self.active_panel()
    }

    pub fn close_panel(&mut self) {
        self.deselect();
    }

    pub fn active_panel(&self) -> Option<PanelView> {
        let block = self.selected_block()?;
        let styles = block.styles.clone().unwrap_or_default();
        let Some(kind) = block.kind() else {
            return Some(PanelView {
                block_id: block.id.clone(),
                type_name: block.content.type_name().to_string(),
                title: "Unknown block",
                editable: false,
                fields: Vec::new(),
                styles,
            });
        };
        let config = match block.content.config_value() {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let fields = panel_fields(kind)
            .iter()
            .map(|spec| PanelField {
                spec: *spec,
                value: config.get(spec.key).cloned().unwrap_or(Value::Null),
            })
            .collect();
        Some(PanelView {
            block_id: block.id.clone(),
            type_name: kind.as_str().to_string(),
            title: kind.label(),
            editable: true,
            fields,
            styles,
        })
    }

    fn selected_for_edit(&self) -> Result<&crate::block::Block, CoreError> {
        self.selected_block()
            .ok_or_else(|| CoreError::Validation("no block is selected".to_string()))
    }

    /// Write one config field of the selected block.
    pub fn edit_field(&mut self, key: &str, value: Value) -> Result<(), CoreError> {
        let block = self.selected_for_edit()?;
        let kind = block.kind().ok_or_else(|| {
            CoreError::Validation("unrecognized blocks cannot be edited".to_string())
        })?;
        let spec = panel_fields(kind)
            .iter()
            .find(|spec| spec.key == key)
            .ok_or_else(|| {
                CoreError::Validation(format!("'{key}' is not a field of the {kind} panel"))
            })?;
        if spec.input == FieldInput::Blocks {
            return Err(CoreError::Validation(format!(
                "'{key}' holds nested blocks and is not editable from the panel"
            )));
        }
        if let (FieldInput::Number { min, max }, Some(n)) = (spec.input, value.as_i64()) {
            if n < min || n > max {
                return Err(CoreError::Validation(format!(
                    "{} must be between {min} and {max}",
                    spec.label
                )));
            }
        }
        let mut fields = Map::new();
        fields.insert(key.to_string(), value);
        let update = BlockPatch::config(fields).resolve(block)?;
        let id = block.id.clone();
        self.update(&id, update);
        Ok(())
    }

    /// Set or clear one style override of the selected block.
    pub fn edit_style(&mut self, field: StyleField, value: Option<&str>) -> Result<(), CoreError> {
        let block = self.selected_for_edit()?;
        let mut styles = block.styles.clone().unwrap_or_default();
        field.apply(&mut styles, value)?;
        let id = block.id.clone();
        self.update(
            &id,
            BlockUpdate {
                styles: Some(styles),
                ..Default::default()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn every_kind_has_a_panel_with_distinct_keys() {
        for kind in BlockKind::ALL {
            let fields = panel_fields(kind);
            assert!(!fields.is_empty(), "{kind}");
            let mut keys: Vec<&str> = fields.iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), fields.len(), "{kind}");
        }
    }

    #[test]
    fn template_values_are_accepted_by_their_panel() {
        let mut editor = EditorState::new(Uuid::new_v4());
        for kind in BlockKind::ALL {
            let id = editor.insert(kind);
            let panel = editor.open_panel(&id).unwrap();
            for field in panel.fields {
                if field.value.is_null() || field.spec.input == FieldInput::Blocks {
                    continue;
                }
                editor
                    .edit_field(field.spec.key, field.value.clone())
                    .unwrap_or_else(|err| panic!("{kind}.{}: {err}", field.spec.key));
            }
        }
    }

    #[test]
    fn edit_field_updates_selected_block() {
        let mut editor = EditorState::new(Uuid::new_v4());
        let id = editor.insert(BlockKind::Hero);
        editor.open_panel(&id).unwrap();
        editor.edit_field("title", json!("Open day")).unwrap();
        let panel = editor.active_panel().unwrap();
        let title = panel.fields.iter().find(|f| f.spec.key == "title").unwrap();
        assert_eq!(title.value, json!("Open day"));
    }

    #[test]
    fn switching_blocks_loads_new_config_without_carry_over() {
        let mut editor = EditorState::new(Uuid::new_v4());
        let hero = editor.insert(BlockKind::Hero);
        let heading = editor.insert(BlockKind::Heading);
        editor.open_panel(&hero).unwrap();
        editor.edit_field("title", json!("Hero title")).unwrap();

        let panel = editor.open_panel(&heading).unwrap();
        assert_eq!(panel.type_name, "heading");
        assert!(panel.fields.iter().all(|f| f.spec.key != "title"));
        let text = panel.fields.iter().find(|f| f.spec.key == "text").unwrap();
        assert_eq!(text.value, json!("Section heading"));
    }

    #[test]
    fn rejects_fields_outside_the_panel_and_bad_values() {
        let mut editor = EditorState::new(Uuid::new_v4());
        let id = editor.insert(BlockKind::Heading);
        editor.select(&id);
        assert!(editor.edit_field("src", json!("x.png")).is_err());
        assert!(editor.edit_field("level", json!(9)).is_err());
        assert!(editor.edit_field("alignment", json!("diagonal")).is_err());
        assert!(editor.edit_field("level", json!(3)).is_ok());
    }

    #[test]
    fn nested_block_fields_are_read_only() {
        let mut editor = EditorState::new(Uuid::new_v4());
        let id = editor.insert(BlockKind::TwoColumn);
        editor.select(&id);
        assert!(editor.edit_field("left", json!([])).is_err());
        assert!(editor.edit_field("ratio", json!("60-40")).is_ok());
    }

    #[test]
    fn edit_without_selection_fails() {
        let mut editor = EditorState::new(Uuid::new_v4());
        editor.insert(BlockKind::Paragraph);
        assert!(editor.edit_field("text", json!("x")).is_err());
        assert!(editor.edit_style(StyleField::Padding, Some("1rem")).is_err());
    }

    #[test]
    fn style_panel_is_shared_across_kinds() {
        let mut editor = EditorState::new(Uuid::new_v4());
        for kind in [BlockKind::Hero, BlockKind::Table, BlockKind::Embed] {
            let id = editor.insert(kind);
            editor.select(&id);
            editor.edit_style(StyleField::BackgroundColor, Some("#eee")).unwrap();
            editor.edit_style(StyleField::TextAlign, Some("center")).unwrap();
            let styles = editor.find(&id).unwrap().styles.clone().unwrap();
            assert_eq!(styles.background_color.as_deref(), Some("#eee"));
            assert_eq!(styles.text_align, Some(TextAlign::Center));
        }
    }

    #[test]
    fn clearing_last_style_drops_overrides() {
        let mut editor = EditorState::new(Uuid::new_v4());
        let id = editor.insert(BlockKind::Paragraph);
        editor.select(&id);
        editor.edit_style(StyleField::Margin, Some("0 auto")).unwrap();
        editor.edit_style(StyleField::Margin, None).unwrap();
        assert!(editor.find(&id).unwrap().styles.is_none());
        assert!(editor.edit_style(StyleField::TextAlign, Some("sideways")).is_err());
    }

    #[test]
    fn unknown_block_panel_is_read_only() {
        let blocks = serde_json::from_value(json!([
            { "id": "u", "type": "countdown", "config": { "to": "2030" } }
        ]))
        .unwrap();
        let mut editor = EditorState::from_blocks(Uuid::new_v4(), blocks);
        let panel = editor.open_panel(&BlockId::new("u")).unwrap();
        assert!(!panel.editable);
        assert!(editor.edit_field("to", json!("2031")).is_err());
    }
}
