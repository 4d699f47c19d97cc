use crate::error::LayoutError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and typography of the diagram. Every layout pass is a pure
/// function of the tree, this value and the injected services; there is no
/// process-wide configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub font_family: String,
    pub font_size: f32,
    /// Gap between the last label line and the connector under it.
    pub label_padding_bottom: f32,
    /// Horizontal clearance kept to the right of a label.
    pub label_padding_right: f32,
    /// Horizontal run a connector spans between parent and child columns.
    pub connector_width: f32,
    /// 0 draws a straight diagonal, 1 a full S-curve.
    pub connector_steepness: f32,
    pub connector_line_width: f32,
    pub node_margin_top: f32,
    pub node_margin_bottom: f32,
    /// Draw branches from the desaturated palette table.
    pub use_grayscale: bool,
    /// Label filter pattern. Part of the configuration surface and
    /// validated, but not yet applied when building the tree.
    pub text_filter: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_family: "Open Sans, sans-serif".to_string(),
            font_size: 13.0,
            label_padding_bottom: 8.0,
            label_padding_right: 10.0,
            connector_width: 65.0,
            connector_steepness: 0.65,
            connector_line_width: 4.5,
            node_margin_top: 5.0,
            node_margin_bottom: 5.0,
            use_grayscale: false,
            text_filter: ".".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Rejects values a layout pass cannot produce sane output from.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.font_size > 0.0) || !self.font_size.is_finite() {
            return Err(LayoutError::InvalidFontSize(self.font_size));
        }
        for (field, value) in [
            ("labelPaddingBottom", self.label_padding_bottom),
            ("labelPaddingRight", self.label_padding_right),
            ("connectorWidth", self.connector_width),
            ("connectorSteepness", self.connector_steepness),
            ("connectorLineWidth", self.connector_line_width),
            ("nodeMarginTop", self.node_margin_top),
            ("nodeMarginBottom", self.node_margin_bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidGeometry { field, value });
            }
        }
        if let Err(source) = Regex::new(&self.text_filter) {
            return Err(LayoutError::InvalidTextFilter {
                pattern: self.text_filter.clone(),
                source,
            });
        }
        Ok(())
    }
}

/// Presentation of the finished surface by the host page: the surrounding
/// margin and the backdrop it is copied onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub margin: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin: 25.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Optional overrides read from a JSON config file. Field names follow the
/// original slider labels (camelCase).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_padding_bottom: Option<f32>,
    label_padding_right: Option<f32>,
    connector_width: Option<f32>,
    connector_steepness: Option<f32>,
    connector_line_width: Option<f32>,
    node_margin_top: Option<f32>,
    node_margin_bottom: Option<f32>,
    use_grayscale: Option<bool>,
    text_filter: Option<String>,
    margin: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    config_from_str(&contents)
}

fn config_from_str(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();
    if let Some(v) = parsed.font_family {
        config.layout.font_family = v;
    }
    if let Some(v) = parsed.font_size {
        config.layout.font_size = v;
    }
    if let Some(v) = parsed.label_padding_bottom {
        config.layout.label_padding_bottom = v;
    }
    if let Some(v) = parsed.label_padding_right {
        config.layout.label_padding_right = v;
    }
    if let Some(v) = parsed.connector_width {
        config.layout.connector_width = v;
    }
    if let Some(v) = parsed.connector_steepness {
        config.layout.connector_steepness = v;
    }
    if let Some(v) = parsed.connector_line_width {
        config.layout.connector_line_width = v;
    }
    if let Some(v) = parsed.node_margin_top {
        config.layout.node_margin_top = v;
    }
    if let Some(v) = parsed.node_margin_bottom {
        config.layout.node_margin_bottom = v;
    }
    if let Some(v) = parsed.use_grayscale {
        config.layout.use_grayscale = v;
    }
    if let Some(v) = parsed.text_filter {
        config.layout.text_filter = v;
    }
    if let Some(v) = parsed.margin {
        config.render.margin = v;
    }
    if let Some(v) = parsed.background {
        config.render.background = v;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let config = config_from_str(
            r#"{"fontSize": 16, "connectorWidth": 40, "useGrayscale": true, "margin": 10}"#,
        )
        .unwrap();
        assert_eq!(config.layout.font_size, 16.0);
        assert_eq!(config.layout.connector_width, 40.0);
        assert!(config.layout.use_grayscale);
        assert_eq!(config.render.margin, 10.0);
        // Untouched fields keep their defaults.
        assert_eq!(config.layout.label_padding_bottom, 8.0);
        assert_eq!(config.render.background, "#FFFFFF");
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        assert!(config_from_str("{not json").is_err());
    }

    #[test]
    fn non_positive_font_size_fails_validation() {
        let mut config = LayoutConfig::default();
        config.font_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidFontSize(_))
        ));
        config.font_size = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidFontSize(_))
        ));
    }

    #[test]
    fn negative_geometry_fails_validation() {
        let mut config = LayoutConfig::default();
        config.connector_width = -1.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidGeometry {
                field: "connectorWidth",
                ..
            })
        ));
    }

    #[test]
    fn bad_text_filter_fails_validation() {
        let mut config = LayoutConfig::default();
        config.text_filter = "[unclosed".to_string();
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidTextFilter { .. })
        ));
    }
}
