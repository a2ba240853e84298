//! Text picture settings
//!
//! Process-wide options captured by every text picture when it is shown.

use dtext_layout::Align;
use serde::{Deserialize, Serialize};

use crate::error::PictureResult;

/// Current text picture settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSettings {
    /// Background color token; `None` for a transparent background
    pub background_color: Option<String>,
    pub gradient_left: u32,
    pub gradient_right: u32,
    /// Re-resolve the text every frame
    pub real_time: bool,
    /// Draw a frame panel behind the picture
    pub show_frame: bool,
    pub align: Option<Align>,
}

/// Sparse settings change; `None` and empty strings leave a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSettingsUpdate {
    pub background_color: Option<String>,
    pub gradient_left: Option<u32>,
    pub gradient_right: Option<u32>,
    pub real_time: Option<bool>,
    pub show_frame: Option<bool>,
    pub align: Option<Align>,
}

impl TextSettings {
    /// Apply the fields present in `update`
    pub fn apply(&mut self, update: &TextSettingsUpdate) {
        if let Some(color) = update.background_color.as_deref() {
            if !color.trim().is_empty() {
                self.background_color = Some(color.trim().to_string());
            }
        }
        if let Some(width) = update.gradient_left {
            self.gradient_left = width;
        }
        if let Some(width) = update.gradient_right {
            self.gradient_right = width;
        }
        if let Some(real_time) = update.real_time {
            self.real_time = real_time;
        }
        if let Some(show_frame) = update.show_frame {
            self.show_frame = show_frame;
        }
        if let Some(align) = update.align {
            self.align = Some(align);
        }
    }

    pub fn to_json(&self) -> PictureResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PictureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TextSettingsUpdate {
    pub fn from_json(json: &str) -> PictureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_update() {
        let mut settings = TextSettings {
            background_color: Some("black".into()),
            gradient_left: 10,
            ..TextSettings::default()
        };

        settings.apply(&TextSettingsUpdate {
            gradient_right: Some(20),
            real_time: Some(true),
            ..TextSettingsUpdate::default()
        });

        assert_eq!(settings.background_color.as_deref(), Some("black"));
        assert_eq!(settings.gradient_left, 10);
        assert_eq!(settings.gradient_right, 20);
        assert!(settings.real_time);
        assert!(!settings.show_frame);
    }

    #[test]
    fn test_empty_color_is_ignored() {
        let mut settings = TextSettings {
            background_color: Some("red".into()),
            ..TextSettings::default()
        };
        settings.apply(&TextSettingsUpdate {
            background_color: Some("  ".into()),
            ..TextSettingsUpdate::default()
        });
        assert_eq!(settings.background_color.as_deref(), Some("red"));
    }

    #[test]
    fn test_false_is_a_value() {
        let mut settings = TextSettings {
            real_time: true,
            show_frame: true,
            ..TextSettings::default()
        };
        settings.apply(&TextSettingsUpdate {
            real_time: Some(false),
            ..TextSettingsUpdate::default()
        });
        assert!(!settings.real_time);
        assert!(settings.show_frame);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = TextSettings {
            background_color: Some("rgba(0,0,0,0.5)".into()),
            gradient_left: 4,
            gradient_right: 8,
            real_time: true,
            show_frame: false,
            align: Some(Align::Center),
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"gradientLeft\":4"));
        assert!(json.contains("\"align\":\"center\""));
        assert_eq!(TextSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_update_from_json() {
        let update = TextSettingsUpdate::from_json(r#"{"showFrame": true, "align": "right"}"#).unwrap();
        assert_eq!(update.show_frame, Some(true));
        assert_eq!(update.align, Some(Align::Right));
        assert_eq!(update.gradient_left, None);
    }
}
