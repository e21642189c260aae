//! Visual configuration applied by every widget call.

use glam::{Vec4, vec4};
use serde::{Deserialize, Serialize};

/// Colors and spacing for the widget set.
///
/// Loaded once at startup and treated as process-wide configuration; the
/// context never mutates it during a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub background: Vec4,
    pub outline: Vec4,
    pub button: Vec4,
    pub button_hover: Vec4,
    pub button_pressed: Vec4,
    pub text: Vec4,
    pub text_size: f32,
    pub text_centered: bool,
    /// Inset applied between a widget's layout cell and its drawn rect.
    pub padding: f32,
    /// Reserved for animated color transitions; not consumed by the core logic.
    pub transition_rate: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: vec4(0.13, 0.13, 0.17, 0.96),
            outline: vec4(0.05, 0.05, 0.07, 1.0),
            button: vec4(0.25, 0.27, 0.36, 1.0),
            button_hover: vec4(0.33, 0.36, 0.48, 1.0),
            button_pressed: vec4(0.18, 0.19, 0.26, 1.0),
            text: Vec4::ONE,
            text_size: 16.0,
            text_centered: true,
            padding: 4.0,
            transition_rate: 8.0,
        }
    }
}

impl Theme {
    /// Parses a theme from a JSON string. Missing fields fall back to the
    /// defaults.
    pub fn from_json(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| e.to_string())
    }

    /// Serializes the theme to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_json_round_trip() {
        let theme = Theme::default();
        let json = theme.to_json().unwrap();
        let parsed = Theme::from_json(&json).unwrap();
        assert_eq!(parsed, theme);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let theme = Theme::from_json(r#"{ "padding": 9.0, "text_centered": false }"#).unwrap();
        assert_eq!(theme.padding, 9.0);
        assert!(!theme.text_centered);
        assert_eq!(theme.text_size, Theme::default().text_size);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Theme::from_json("{ padding: nope }").is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Theme::from_json(r#"{ "paddding": 2.0 }"#).is_err());
    }
}
