//! Strip layout
//!
//! `StripLayout::derive` is a pure function of the strip state: it decides
//! where the band, card, photos and caption go, and carries everything the
//! rasterizer needs (shared photo pixels, colors, the filter transform and
//! the typesetter). Cloning a layout is cheap, so a layout doubles as the
//! snapshot an export works from.

use image::{Rgba, RgbaImage};
use std::sync::Arc;

use super::style::StripStyle;
use super::text::Typesetter;
use crate::color::{parse_hex, ColorTransform};
use crate::state::data::{Photo, PhotoStatus};
use crate::state::strip::PhotoStripState;

/// Band color used when the strip color is not a valid hex string
pub const FALLBACK_BAND_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// What goes into a photo slot
#[derive(Debug, Clone)]
pub enum SlotContent {
    Photo(Arc<RgbaImage>),
    /// Still decoding
    Pending,
    /// Could not be decoded
    Broken,
}

#[derive(Debug, Clone)]
pub struct PhotoSlot {
    pub rect: Rect,
    pub content: SlotContent,
    pub label: String,
}

/// Wrapped caption and where it goes
#[derive(Debug, Clone)]
pub struct CaptionBlock {
    pub rect: Rect,
    pub lines: Vec<String>,
    pub line_height: u32,
    pub color: Rgba<u8>,
}

/// A fully positioned strip, ready to rasterize
#[derive(Debug, Clone)]
pub struct StripLayout {
    pub width: u32,
    pub height: u32,
    pub band: Rect,
    pub band_color: Rgba<u8>,
    pub card: Rect,
    pub card_color: Rgba<u8>,
    pub photos: Vec<PhotoSlot>,
    pub caption: CaptionBlock,
    /// Applied to every photo at raster time
    pub filter: ColorTransform,
    pub pending_color: Rgba<u8>,
    pub broken_color: Rgba<u8>,
    pub typesetter: Typesetter,
}

impl StripLayout {
    /// Lay out the strip for the current state
    ///
    /// Top to bottom: photos in upload order separated by the photo gap,
    /// then the caption margin, then the wrapped caption. Zero photos still
    /// produce the band, the card and the caption area.
    pub fn derive(state: &PhotoStripState, style: &StripStyle, typesetter: &Typesetter) -> Self {
        let content_x = style.band_width + style.padding;
        let mut cursor_y = style.padding;

        let photos: Vec<PhotoSlot> = state
            .images()
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                if index > 0 {
                    cursor_y += style.photo_gap;
                }
                let slot = photo_slot(photo, content_x, cursor_y, style.photo_width);
                cursor_y += slot.rect.height;
                slot
            })
            .collect();

        cursor_y += style.caption_margin;

        let lines = typesetter.wrap(state.caption(), style.photo_width as f32);
        let caption = CaptionBlock {
            rect: Rect::new(
                content_x,
                cursor_y,
                style.photo_width,
                lines.len() as u32 * style.line_height,
            ),
            lines,
            line_height: style.line_height,
            color: style.caption_rgba(),
        };
        cursor_y += caption.rect.height;

        let width = style.band_width + style.padding * 2 + style.photo_width;
        let height = cursor_y + style.padding;

        log::debug!(
            "Laid out strip: {} photos, {} caption lines, {}x{}",
            photos.len(),
            caption.lines.len(),
            width,
            height
        );

        Self {
            width,
            height,
            band: Rect::new(0, 0, style.band_width, height),
            band_color: parse_hex(state.strip_color()).unwrap_or(FALLBACK_BAND_COLOR),
            card: Rect::new(style.band_width, 0, width - style.band_width, height),
            card_color: style.card_rgba(),
            photos,
            caption,
            filter: state.filter().transform(),
            pending_color: style.pending_rgba(),
            broken_color: style.broken_rgba(),
            typesetter: typesetter.clone(),
        }
    }
}

fn photo_slot(photo: &Photo, x: u32, y: u32, width: u32) -> PhotoSlot {
    // Placeholders keep a 4:3 box so the strip does not jump when photos load
    let placeholder_height = width * 3 / 4;

    let (content, height) = match &photo.status {
        PhotoStatus::Ready(pixels) => (SlotContent::Photo(pixels.clone()), pixels.height()),
        PhotoStatus::Pending => (SlotContent::Pending, placeholder_height),
        PhotoStatus::Broken(_) => (SlotContent::Broken, placeholder_height),
    };

    PhotoSlot {
        rect: Rect::new(x, y, width, height),
        content,
        label: photo.label(),
    }
}
