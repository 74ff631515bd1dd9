//! The fixed set of strip filters
//!
//! A filter applies uniformly to every photo in the strip. It is a display
//! transform only; stored photo pixels are never modified.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::ColorTransform;

/// Filters offered in the filter pick list
///
/// Deserializes leniently through `from_id`, so a style file naming an
/// unknown filter still loads.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum StripFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Contrast,
    Brightness,
    Saturate,
}

impl StripFilter {
    /// Every filter, in pick list order
    pub const ALL: [StripFilter; 6] = [
        StripFilter::None,
        StripFilter::Grayscale,
        StripFilter::Sepia,
        StripFilter::Contrast,
        StripFilter::Brightness,
        StripFilter::Saturate,
    ];

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            StripFilter::None => "none",
            StripFilter::Grayscale => "grayscale",
            StripFilter::Sepia => "sepia",
            StripFilter::Contrast => "contrast",
            StripFilter::Brightness => "brightness",
            StripFilter::Saturate => "saturate",
        }
    }

    /// The CSS filter string this option stands for
    pub fn css(self) -> &'static str {
        match self {
            StripFilter::None => "none",
            StripFilter::Grayscale => "grayscale(1)",
            StripFilter::Sepia => "sepia(1)",
            StripFilter::Contrast => "contrast(1.5)",
            StripFilter::Brightness => "brightness(1.2)",
            StripFilter::Saturate => "saturate(2)",
        }
    }

    /// Human readable label for the pick list
    pub fn label(self) -> &'static str {
        match self {
            StripFilter::None => "None",
            StripFilter::Grayscale => "Grayscale",
            StripFilter::Sepia => "Sepia",
            StripFilter::Contrast => "Contrast",
            StripFilter::Brightness => "Bright",
            StripFilter::Saturate => "Saturated",
        }
    }

    /// Look up a filter by identifier or by CSS string
    ///
    /// Unknown values resolve to `StripFilter::None` (identity).
    pub fn from_id(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|filter| {
                filter.id().eq_ignore_ascii_case(value) || filter.css().eq_ignore_ascii_case(value)
            })
            .unwrap_or_default()
    }

    /// The color transform applied to each photo
    pub fn transform(self) -> ColorTransform {
        ColorTransform::from_css(self.css())
    }
}

impl From<String> for StripFilter {
    fn from(value: String) -> Self {
        Self::from_id(&value)
    }
}

impl fmt::Display for StripFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let filter = StripFilter::default();
        assert_eq!(filter, StripFilter::None);
        assert!(filter.transform().is_identity());
    }

    #[test]
    fn test_from_id_accepts_ids_and_css() {
        assert_eq!(StripFilter::from_id("sepia"), StripFilter::Sepia);
        assert_eq!(StripFilter::from_id("sepia(1)"), StripFilter::Sepia);
        assert_eq!(StripFilter::from_id("SATURATE"), StripFilter::Saturate);
        assert_eq!(StripFilter::from_id("brightness(1.2)"), StripFilter::Brightness);
    }

    #[test]
    fn test_unknown_id_falls_back_to_none() {
        assert_eq!(StripFilter::from_id("blur(3px)"), StripFilter::None);
        assert_eq!(StripFilter::from_id(""), StripFilter::None);
        assert_eq!(StripFilter::from_id("vintage"), StripFilter::None);
    }

    #[test]
    fn test_every_non_default_filter_changes_pixels() {
        for filter in StripFilter::ALL.into_iter().filter(|f| *f != StripFilter::None) {
            assert!(!filter.transform().is_identity(), "{} should not be identity", filter.id());
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&StripFilter::Grayscale).unwrap();
        assert_eq!(json, "\"grayscale\"");

        let restored: StripFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, StripFilter::Grayscale);

        let css: StripFilter = serde_json::from_str("\"contrast(1.5)\"").unwrap();
        assert_eq!(css, StripFilter::Contrast);
        let unknown: StripFilter = serde_json::from_str("\"blur(3px)\"").unwrap();
        assert_eq!(unknown, StripFilter::None);
    }
}
