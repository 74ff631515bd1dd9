//! Strip layout constants
//!
//! Defaults reproduce the classic strip: 256px photos on a white card with
//! 16px padding and a 20px colored band on the left. A `style.json` in the
//! user's config directory can override any of them.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::color::parse_hex;
use crate::state::filter::StripFilter;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StripStyle {
    /// Fixed display width of every photo
    pub photo_width: u32,
    /// Width of the colored band on the left edge
    pub band_width: u32,
    /// Card padding on every side
    pub padding: u32,
    /// Vertical gap between photos
    pub photo_gap: u32,
    /// Space between the last photo and the caption
    pub caption_margin: u32,
    pub font_size: f32,
    pub line_height: u32,
    pub card_color: String,
    pub caption_color: String,
    /// Fill for photos still decoding
    pub pending_color: String,
    /// Fill for photos that failed to decode
    pub broken_color: String,
    /// Name of the exported file
    pub file_name: String,
    /// Filter selected when the window opens
    pub filter: StripFilter,
}

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            photo_width: 256,
            band_width: 20,
            padding: 16,
            photo_gap: 16,
            caption_margin: 16,
            font_size: 14.0,
            line_height: 20,
            card_color: "#ffffff".to_string(),
            caption_color: "#374151".to_string(),
            pending_color: "#e5e7eb".to_string(),
            broken_color: "#9ca3af".to_string(),
            file_name: "photobooth-strip.png".to_string(),
            filter: StripFilter::None,
        }
    }
}

impl StripStyle {
    /// Load the user's style overrides, or the defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from a specific file
    ///
    /// A missing file is normal and silently yields the defaults. A file that
    /// cannot be read or parsed is logged and also yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("⚠️  Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(style) => {
                log::info!("🎨 Loaded strip style from {}", path.display());
                style
            }
            Err(e) => {
                log::warn!("⚠️  Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// `<config_dir>/vintage-photobooth/style.json`
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("vintage-photobooth");
        path.push("style.json");
        Some(path)
    }

    pub fn card_rgba(&self) -> Rgba<u8> {
        parse_hex(&self.card_color).unwrap_or(Rgba([255, 255, 255, 255]))
    }

    pub fn caption_rgba(&self) -> Rgba<u8> {
        parse_hex(&self.caption_color).unwrap_or(Rgba([55, 65, 81, 255]))
    }

    pub fn pending_rgba(&self) -> Rgba<u8> {
        parse_hex(&self.pending_color).unwrap_or(Rgba([229, 231, 235, 255]))
    }

    pub fn broken_rgba(&self) -> Rgba<u8> {
        parse_hex(&self.broken_color).unwrap_or(Rgba([156, 163, 175, 255]))
    }
}
