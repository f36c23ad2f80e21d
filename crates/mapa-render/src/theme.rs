use crate::text::TextStyle;
use crate::{Error, Result};
use mapa_core::NodeKind;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Visual treatment of one node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardStyle {
    pub fill: String,
    pub stroke: String,
    pub text_color: String,
    pub font_size: f64,
    pub font_weight: Option<String>,
    /// Renders a soft drop shadow under the card.
    pub shadow: bool,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            fill: "#ffffff".to_string(),
            stroke: "#e5e7eb".to_string(),
            text_color: "#374151".to_string(),
            font_size: 16.0,
            font_weight: None,
            shadow: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub background: String,
    /// Dot grid color; `None` disables the grid.
    pub grid_color: Option<String>,
    pub grid_spacing: f64,
    pub grid_opacity: f64,
    pub link_color: String,
    pub link_width: f64,
    pub font_family: String,
    pub line_height: f64,
    pub card_radius: f64,
    pub card_stroke_width: f64,
    pub card_padding: f64,
    /// Card overrides in JSON are layered onto the indigo card of the same kind.
    #[serde(deserialize_with = "root_card")]
    pub root: CardStyle,
    #[serde(deserialize_with = "category_card")]
    pub category: CardStyle,
    #[serde(deserialize_with = "item_card")]
    pub item: CardStyle,
}

fn card_over<'de, D: Deserializer<'de>>(
    d: D,
    base: CardStyle,
) -> std::result::Result<CardStyle, D::Error> {
    let patch = serde_json::Map::<String, serde_json::Value>::deserialize(d)?;
    let mut value = serde_json::to_value(base).map_err(D::Error::custom)?;
    if let Some(fields) = value.as_object_mut() {
        fields.extend(patch);
    }
    serde_json::from_value(value).map_err(D::Error::custom)
}

fn root_card<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<CardStyle, D::Error> {
    card_over(d, Theme::indigo().root)
}

fn category_card<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<CardStyle, D::Error> {
    card_over(d, Theme::indigo().category)
}

fn item_card<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<CardStyle, D::Error> {
    card_over(d, Theme::indigo().item)
}

impl Default for Theme {
    fn default() -> Self {
        Self::indigo()
    }
}

impl Theme {
    pub const BUILT_IN: [&'static str; 2] = ["indigo", "slate"];

    pub fn indigo() -> Self {
        Self {
            name: "indigo".to_string(),
            background: "#f8fafc".to_string(),
            grid_color: Some("#cbd5e1".to_string()),
            grid_spacing: 24.0,
            grid_opacity: 0.4,
            link_color: "#bfdbfe".to_string(),
            link_width: 2.0,
            font_family: "ui-sans-serif, system-ui, sans-serif".to_string(),
            line_height: 1.25,
            card_radius: 12.0,
            card_stroke_width: 2.0,
            card_padding: 12.0,
            root: CardStyle {
                fill: "#c7d2fe".to_string(),
                stroke: "#818cf8".to_string(),
                text_color: "#312e81".to_string(),
                font_size: 16.0,
                font_weight: Some("700".to_string()),
                shadow: true,
            },
            category: CardStyle {
                fill: "#eef2ff".to_string(),
                stroke: "#c7d2fe".to_string(),
                text_color: "#3730a3".to_string(),
                font_size: 16.0,
                font_weight: Some("600".to_string()),
                shadow: true,
            },
            item: CardStyle {
                fill: "#ecfdf5".to_string(),
                stroke: "#a7f3d0".to_string(),
                text_color: "#064e3b".to_string(),
                font_size: 14.0,
                font_weight: Some("500".to_string()),
                shadow: false,
            },
        }
    }

    /// Low-contrast variant for print.
    pub fn slate() -> Self {
        Self {
            name: "slate".to_string(),
            background: "#ffffff".to_string(),
            grid_color: None,
            link_color: "#94a3b8".to_string(),
            link_width: 1.5,
            root: CardStyle {
                fill: "#e2e8f0".to_string(),
                stroke: "#475569".to_string(),
                text_color: "#0f172a".to_string(),
                font_size: 16.0,
                font_weight: Some("700".to_string()),
                shadow: false,
            },
            category: CardStyle {
                fill: "#f1f5f9".to_string(),
                stroke: "#94a3b8".to_string(),
                text_color: "#1e293b".to_string(),
                font_size: 16.0,
                font_weight: Some("600".to_string()),
                shadow: false,
            },
            item: CardStyle {
                fill: "#ffffff".to_string(),
                stroke: "#cbd5e1".to_string(),
                text_color: "#334155".to_string(),
                font_size: 14.0,
                font_weight: None,
                shadow: false,
            },
            ..Self::indigo()
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "indigo" | "default" => Ok(Self::indigo()),
            "slate" => Ok(Self::slate()),
            _ => Err(Error::UnknownTheme {
                name: name.to_string(),
            }),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn card(&self, kind: NodeKind) -> &CardStyle {
        match kind {
            NodeKind::Root => &self.root,
            NodeKind::Category => &self.category,
            NodeKind::Item => &self.item,
        }
    }

    pub fn text_style(&self, kind: NodeKind) -> TextStyle {
        let card = self.card(kind);
        TextStyle {
            font_family: Some(self.font_family.clone()),
            font_size: card.font_size,
            font_weight: card.font_weight.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_themes_resolve_by_name() {
        assert_eq!(Theme::by_name("Indigo").unwrap(), Theme::indigo());
        assert_eq!(Theme::by_name("slate").unwrap().name, "slate");
        assert!(matches!(
            Theme::by_name("neon"),
            Err(Error::UnknownTheme { ref name }) if name == "neon"
        ));
    }

    #[test]
    fn cards_are_styled_by_kind() {
        let theme = Theme::indigo();
        assert_eq!(theme.card(NodeKind::Root).fill, "#c7d2fe");
        assert_eq!(theme.card(NodeKind::Item).fill, "#ecfdf5");
        assert_eq!(theme.text_style(NodeKind::Item).font_size, 14.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let theme =
            Theme::from_json_str(r##"{ "linkColor": "#000000", "item": { "fill": "#fafafa" } }"##)
                .unwrap();
        assert_eq!(theme.link_color, "#000000");
        assert_eq!(theme.background, "#f8fafc");
        assert_eq!(theme.item.fill, "#fafafa");
        assert_eq!(theme.item.stroke, "#a7f3d0");
        assert_eq!(theme.item.font_size, 14.0);
        assert_eq!(theme.item.font_weight.as_deref(), Some("500"));
        assert_eq!(theme.root, Theme::indigo().root);
    }

    #[test]
    fn card_overrides_reject_non_objects() {
        assert!(matches!(
            Theme::from_json_str(r#"{ "root": "red" }"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn full_theme_json_round_trips() {
        let text = serde_json::to_string(&Theme::slate()).unwrap();
        assert_eq!(Theme::from_json_str(&text).unwrap(), Theme::slate());
    }
}
