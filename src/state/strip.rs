//! The photo strip state owned by the photobooth window
//!
//! Setters are the only way to change it. Every file selection replaces the
//! whole photo sequence; nothing is ever appended.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use super::data::{Photo, PhotoStatus};
use super::filter::StripFilter;
use crate::color::DEFAULT_STRIP_COLOR;

/// Everything the strip is composed from
#[derive(Debug, Clone)]
pub struct PhotoStripState {
    /// Hex color of the left band
    strip_color: String,
    /// Free text shown under the photos
    caption: String,
    /// Display-only date, fixed when the state is created
    captured_date: String,
    /// Photos in upload order
    images: Vec<Photo>,
    /// Applies to every photo at once
    filter: StripFilter,
    /// Bumped on every selection so stale decode results can be dropped
    generation: u64,
}

impl Default for PhotoStripState {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoStripState {
    /// Create a fresh state dated today
    pub fn new() -> Self {
        Self::with_date(Local::now().date_naive())
    }

    /// Create a fresh state with a fixed capture date
    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            strip_color: DEFAULT_STRIP_COLOR.to_string(),
            caption: String::new(),
            captured_date: format_date(date),
            images: Vec::new(),
            filter: StripFilter::default(),
            generation: 0,
        }
    }

    pub fn strip_color(&self) -> &str {
        &self.strip_color
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn captured_date(&self) -> &str {
        &self.captured_date
    }

    pub fn images(&self) -> &[Photo] {
        &self.images
    }

    pub fn filter(&self) -> StripFilter {
        self.filter
    }

    /// Replace the photo sequence with one pending photo per path
    ///
    /// Returns the new selection generation. The previous photos (and their
    /// decoded pixels) are released here.
    pub fn select_images(&mut self, paths: Vec<PathBuf>) -> u64 {
        let released = self.images.len();

        self.generation += 1;
        self.images = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| Photo::pending(index + 1, path))
            .collect();

        if released > 0 {
            log::debug!("Released {} photo handles from the previous selection", released);
        }
        log::info!("📷 Selected {} photos (selection #{})", self.images.len(), self.generation);

        self.generation
    }

    /// Fill in decode results for a selection, by position
    ///
    /// Results for a superseded selection are ignored. Returns whether the
    /// results were applied.
    pub fn attach_loaded(&mut self, generation: u64, results: Vec<PhotoStatus>) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping decode results for selection #{} (current is #{})",
                generation,
                self.generation
            );
            return false;
        }

        for (photo, status) in self.images.iter_mut().zip(results) {
            if let PhotoStatus::Broken(reason) = &status {
                log::warn!(
                    "⚠️  {} ({}) will show as a placeholder: {}",
                    photo.label(),
                    photo.path.display(),
                    reason
                );
            }
            photo.status = status;
        }

        true
    }

    pub fn set_strip_color(&mut self, color: impl Into<String>) {
        self.strip_color = color.into();
    }

    pub fn set_caption(&mut self, text: impl Into<String>) {
        self.caption = text.into();
    }

    pub fn set_filter(&mut self, filter: StripFilter) {
        self.filter = filter;
    }
}

/// Short numeric date, e.g. `10/18/2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
