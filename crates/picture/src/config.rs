//! Subsystem configuration
//!
//! Values fixed for the lifetime of a [`crate::TextPictureSubsystem`]. Loaded
//! from JSON with camelCase keys; every key is optional.

use std::path::Path;

use dtext_escape::{ResolverConfig, DEFAULT_COLOR_VARIABLE_OFFSET, DEFAULT_PAD_CHARACTER};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PictureResult;

/// Default gap between a text bitmap and its frame panel
pub const DEFAULT_FRAME_PADDING: u32 = 18;

/// Default number of picture slots
pub const DEFAULT_MAX_PICTURES: usize = 100;

/// Text picture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextPictureConfig {
    /// Window skin used for frame panels; `None` for the built-in look
    pub frame_window_skin: Option<String>,
    pub frame_window_padding: u32,
    /// Fill character for `\V[n,m]`
    #[serde(deserialize_with = "pad_character")]
    pub pad_character: char,
    /// Prepended to every prepared text
    pub prefix_text: String,
    pub max_pictures: usize,
    pub color_variable_offset: usize,
}

impl Default for TextPictureConfig {
    fn default() -> Self {
        Self {
            frame_window_skin: None,
            frame_window_padding: DEFAULT_FRAME_PADDING,
            pad_character: DEFAULT_PAD_CHARACTER,
            prefix_text: String::new(),
            max_pictures: DEFAULT_MAX_PICTURES,
            color_variable_offset: DEFAULT_COLOR_VARIABLE_OFFSET,
        }
    }
}

impl TextPictureConfig {
    pub fn from_json(json: &str) -> PictureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PictureResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            pad_character: self.pad_character,
            color_variable_offset: self.color_variable_offset,
        }
    }
}

/// First character of a string; empty means the default
fn pad_character<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.chars().next().unwrap_or(DEFAULT_PAD_CHARACTER))
}
