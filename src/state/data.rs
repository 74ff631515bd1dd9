//! Shared data structures for the strip state
//!
//! These structs represent the transient photo handles that flow between
//! the loader, the strip state and the composer.

use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Load status of a selected photo
#[derive(Debug, Clone)]
pub enum PhotoStatus {
    /// Selected, decode still running
    Pending,
    /// Decoded and scaled to the display width
    Ready(Arc<RgbaImage>),
    /// Not decodable as an image; rendered as a placeholder
    Broken(String),
}

/// A single selected photo
///
/// Identity is the position in the selection, nothing else. Two selections
/// of the same file are two unrelated photos.
#[derive(Debug, Clone)]
pub struct Photo {
    /// 1-based position in the selection (used for "Photo N" labels)
    pub position: usize,
    /// File the photo was selected from
    pub path: PathBuf,
    pub status: PhotoStatus,
}

impl Photo {
    pub fn pending(position: usize, path: PathBuf) -> Self {
        Self {
            position,
            path,
            status: PhotoStatus::Pending,
        }
    }

    /// Display label, mirrors the alt text of the strip
    pub fn label(&self) -> String {
        format!("Photo {}", self.position)
    }
}
