use serde::{Deserialize, Serialize};

/// Horizontal text alignment, shared by style overrides and several configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Style overrides applicable to any block regardless of its kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

impl BlockStyles {
    pub fn is_empty(&self) -> bool {
        *self == BlockStyles::default()
    }

    /// Overlay every field set in `other` onto `self`.
    pub fn merge(&mut self, other: &BlockStyles) {
        fn take(dst: &mut Option<String>, src: &Option<String>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        take(&mut self.background_color, &other.background_color);
        take(&mut self.text_color, &other.text_color);
        take(&mut self.padding, &other.padding);
        take(&mut self.margin, &other.margin);
        take(&mut self.font_family, &other.font_family);
        take(&mut self.font_size, &other.font_size);
        take(&mut self.font_weight, &other.font_weight);
        take(&mut self.max_width, &other.max_width);
        take(&mut self.border_radius, &other.border_radius);
        if other.text_align.is_some() {
            self.text_align = other.text_align;
        }
    }

    /// Inline CSS declarations for the set fields, in a stable order.
    pub fn to_css(&self) -> String {
        let pairs = [
            ("background-color", self.background_color.as_deref()),
            ("color", self.text_color.as_deref()),
            ("padding", self.padding.as_deref()),
            ("margin", self.margin.as_deref()),
            ("font-family", self.font_family.as_deref()),
            ("font-size", self.font_size.as_deref()),
            ("font-weight", self.font_weight.as_deref()),
            ("text-align", self.text_align.map(TextAlign::as_str)),
            ("max-width", self.max_width.as_deref()),
            ("border-radius", self.border_radius.as_deref()),
        ];
        pairs
            .iter()
            .filter_map(|(prop, value)| value.map(|v| format!("{prop}: {v}")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
