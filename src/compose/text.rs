//! Caption typesetting
//!
//! Captions are drawn with an italic sans-serif face found among the system
//! fonts. Whitespace (including newlines) collapses to single spaces and
//! lines wrap at word boundaries, the way the caption reads in a browser.
//! Words longer than a line are left to overflow and get clipped.
//!
//! When no usable font exists the caption is still measured with an
//! estimated advance, so the strip keeps its shape, but no glyphs are drawn.

use ab_glyph::{point, Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use super::raster::blend_pixel;

/// Average advance of a glyph relative to the font size, when no font exists
const FALLBACK_ADVANCE: f32 = 0.5;

/// System font lookup is slow, so it happens once per process
static SYSTEM_FONT: OnceLock<Option<FontArc>> = OnceLock::new();

/// Measures, wraps and draws caption text at a fixed size
#[derive(Clone)]
pub struct Typesetter {
    font: Option<FontArc>,
    size: f32,
}

impl Typesetter {
    /// Typesetter backed by the system's italic sans-serif face, if any
    pub fn system(size: f32) -> Self {
        match SYSTEM_FONT.get_or_init(load_system_font) {
            Some(font) => Self {
                font: Some(font.clone()),
                size,
            },
            None => Self::fallback(size),
        }
    }

    /// Typesetter that only estimates widths and never draws
    pub fn fallback(size: f32) -> Self {
        Self { font: None, size }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width of `text` on a single line, in pixels
    pub fn measure(&self, text: &str) -> f32 {
        let Some(font) = &self.font else {
            return text.chars().count() as f32 * self.size * FALLBACK_ADVANCE;
        };

        let scaled = font.as_scaled(PxScale::from(self.size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                width += scaled.kern(previous, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        width
    }

    /// Collapse whitespace and greedily wrap words to `max_width`
    ///
    /// Empty or whitespace-only text produces no lines.
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if self.measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    /// Draw one line with its box starting at (`x`, `top`)
    ///
    /// The glyphs are vertically centered in `line_height`, like CSS
    /// half-leading. Pixels outside the canvas are dropped.
    pub fn draw_line(
        &self,
        canvas: &mut RgbaImage,
        line: &str,
        x: f32,
        top: f32,
        line_height: f32,
        color: Rgba<u8>,
    ) {
        let Some(font) = &self.font else {
            return;
        };

        let scale = PxScale::from(self.size);
        let scaled = font.as_scaled(scale);
        let content_height = scaled.ascent() - scaled.descent();
        let baseline = top + (line_height - content_height) / 2.0 + scaled.ascent();

        let mut caret = x;
        let mut previous: Option<GlyphId> = None;

        for c in line.chars() {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }

            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                // Whitespace and missing glyphs have no outline
                continue;
            };

            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                blend_pixel(canvas, px, py, color, coverage);
            });
        }
    }
}

impl std::fmt::Debug for Typesetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typesetter")
            .field("has_font", &self.has_font())
            .field("size", &self.size)
            .finish()
    }
}

/// Find an italic sans-serif face among the installed fonts
fn load_system_font() -> Option<FontArc> {
    let mut db = Database::new();
    db.load_system_fonts();

    let families = [
        Family::Name("DejaVu Sans"),
        Family::Name("Liberation Sans"),
        Family::Name("Noto Sans"),
        Family::Name("Helvetica"),
        Family::SansSerif,
    ];
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Italic,
    };

    // Any face beats no caption at all
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|face| face.id))?;

    let font = db.with_face_data(id, |data, index| {
        FontVec::try_from_vec_and_index(data.to_vec(), index)
    })?;

    match font {
        Ok(font) => {
            log::debug!("Caption font loaded ({} system faces scanned)", db.len());
            Some(FontArc::new(font))
        }
        Err(e) => {
            log::warn!("⚠️  Caption font unusable, captions will not be drawn: {}", e);
            None
        }
    }
}
