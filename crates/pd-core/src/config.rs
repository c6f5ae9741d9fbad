//! Canvas configuration.
//!
//! Every field has a default, so a host only has to send the fields it
//! wants to change: `{"width": 1280}` is a complete config.

use crate::error::DocumentError;
use crate::model::{Color, MIN_ELEMENT_SIZE};
use serde::{Deserialize, Deserializer};

/// Configuration for a canvas session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Canvas width in pixels. Default: **1000**.
    pub width: f64,
    /// Canvas height in pixels. Default: **600**.
    pub height: f64,
    /// Clear color. Default: **#FFFFFF**.
    #[serde(deserialize_with = "hex_color")]
    pub background: Color,
    /// Resize floor for element width/height. Default: **50**.
    pub min_size: f64,
    /// Side of a resize handle square, in world units. Default: **10**.
    pub handle_size: f64,
    /// Caption font size in pixels. Default: **14**.
    pub caption_size: f64,
    #[serde(deserialize_with = "hex_color")]
    pub border_color: Color,
    #[serde(deserialize_with = "hex_color")]
    pub handle_color: Color,
    #[serde(deserialize_with = "hex_color")]
    pub selection_color: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            background: Color::WHITE,
            min_size: MIN_ELEMENT_SIZE,
            handle_size: 10.0,
            caption_size: 14.0,
            border_color: Color::rgb8(0xCC, 0xCC, 0xCC),
            handle_color: Color::rgb8(0x4F, 0xC3, 0xF7),
            selection_color: Color::rgb8(0x19, 0x76, 0xD2),
        }
    }
}

impl CanvasConfig {
    /// # Errors
    /// `Json` for malformed JSON or an unparsable color.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let s = String::deserialize(deserializer)?;
    Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CanvasConfig::from_json(r##"{"width": 1280, "background": "#F5F5F5"}"##)
            .unwrap();
        assert_eq!(config.width, 1280.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.background.to_hex(), "#F5F5F5");
        assert_eq!(config.min_size, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn camel_case_keys() {
        let config = CanvasConfig::from_json(r#"{"handleSize": 12, "minSize": 40}"#).unwrap();
        assert_eq!(config.handle_size, 12.0);
        assert_eq!(config.min_size, 40.0);
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(CanvasConfig::from_json(r#"{"background": "blue-ish"}"#).is_err());
    }
}
