use crate::Result;
use mapa_layout::LayoutConfig;
use mapa_render::{Theme, ViewportConfig};
use serde::{Deserialize, Serialize};

/// Everything a [`crate::MapSession`] can be tuned with. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub theme: Theme,
}

impl MapConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_in_defaults() {
        let cfg = MapConfig::from_json_str(
            r#"{
                "layout": { "nodeWidth": 200, "verticalGap": 40 },
                "viewport": { "zoomStepFactor": 2.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.layout.node_width, 200.0);
        assert_eq!(cfg.layout.vertical_gap, 40.0);
        assert_eq!(cfg.layout.node_height, 60.0);
        assert_eq!(cfg.viewport.zoom_step_factor, 2.0);
        assert_eq!(cfg.viewport.fit_padding, 80.0);
        assert_eq!(cfg.theme, Theme::indigo());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = MapConfig::from_json_str("{ layout: }").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)), "{err}");
    }
}
