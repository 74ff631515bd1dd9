//! Strip rasterizer
//!
//! Draws a `StripLayout` into a single RGBA bitmap: card, band, photos with
//! the strip filter applied to a copy of each, placeholders, then caption.

use image::{Rgba, RgbaImage};

use super::layout::{Rect, SlotContent, StripLayout};
use crate::color::ColorTransform;

/// Rasterize a layout at 1:1 scale
pub fn rasterize(layout: &StripLayout) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, layout.card_color);

    fill_rect(&mut canvas, layout.band, layout.band_color);

    for slot in &layout.photos {
        match &slot.content {
            SlotContent::Photo(pixels) => {
                draw_photo(&mut canvas, pixels, slot.rect, &layout.filter)
            }
            SlotContent::Pending => fill_rect(&mut canvas, slot.rect, layout.pending_color),
            SlotContent::Broken => {
                // Broken photos show their label in the empty box
                fill_rect(&mut canvas, slot.rect, layout.broken_color);
                layout.typesetter.draw_line(
                    &mut canvas,
                    &slot.label,
                    (slot.rect.x + 8) as f32,
                    (slot.rect.y + 8) as f32,
                    layout.caption.line_height as f32,
                    layout.caption.color,
                );
            }
        }
    }

    let caption = &layout.caption;
    for (index, line) in caption.lines.iter().enumerate() {
        let top = caption.rect.y + index as u32 * caption.line_height;
        layout.typesetter.draw_line(
            &mut canvas,
            line,
            caption.rect.x as f32,
            top as f32,
            caption.line_height as f32,
            caption.color,
        );
    }

    canvas
}

/// Fill a rectangle, clipped to the canvas
fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let x_end = (rect.x + rect.width).min(canvas.width());
    let y_end = (rect.y + rect.height).min(canvas.height());

    for y in rect.y..y_end {
        for x in rect.x..x_end {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Composite a photo into its slot through the filter
///
/// The source pixels are only read; the filtered result lands on the canvas.
fn draw_photo(canvas: &mut RgbaImage, pixels: &RgbaImage, rect: Rect, filter: &ColorTransform) {
    let identity = filter.is_identity();

    for (x, y, pixel) in pixels.enumerate_pixels() {
        if x >= rect.width || y >= rect.height {
            continue;
        }

        let filtered = if identity { *pixel } else { filter.apply(*pixel) };
        let coverage = filtered[3] as f32 / 255.0;
        blend_pixel(
            canvas,
            (rect.x + x) as i64,
            (rect.y + y) as i64,
            Rgba([filtered[0], filtered[1], filtered[2], 255]),
            coverage,
        );
    }
}

/// Source-over blend of `color` at `coverage` (0.0-1.0) onto one pixel
///
/// Coordinates outside the canvas are ignored.
pub(super) fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }

    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let target = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        let below = target[channel] as f32;
        let above = color[channel] as f32;
        target[channel] = (above * alpha + below * (1.0 - alpha)).round() as u8;
    }
    target[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::style::StripStyle;
    use crate::compose::text::Typesetter;
    use crate::state::data::PhotoStatus;
    use crate::state::filter::StripFilter;
    use crate::state::strip::PhotoStripState;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Arc;

    const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);
    const BLUE: Rgba<u8> = Rgba([30, 30, 200, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn state_with(colors: &[Rgba<u8>]) -> (PhotoStripState, Vec<Arc<RgbaImage>>) {
        let mut state = PhotoStripState::with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let paths = (0..colors.len()).map(|i| PathBuf::from(format!("{}.png", i))).collect();
        let generation = state.select_images(paths);

        let pixels: Vec<_> = colors
            .iter()
            .map(|c| Arc::new(RgbaImage::from_pixel(256, 100, *c)))
            .collect();
        state.attach_loaded(
            generation,
            pixels.iter().cloned().map(PhotoStatus::Ready).collect(),
        );
        (state, pixels)
    }

    fn render(state: &PhotoStripState) -> RgbaImage {
        let style = StripStyle::default();
        let layout = StripLayout::derive(state, &style, &Typesetter::fallback(14.0));
        rasterize(&layout)
    }

    #[test]
    fn test_empty_strip_has_band_and_card() {
        let (state, _) = state_with(&[]);
        let image = render(&state);

        assert_eq!(image.dimensions(), (308, 48));
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(19, 47), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(20, 0), WHITE);
        assert_eq!(*image.get_pixel(307, 47), WHITE);
    }

    #[test]
    fn test_photos_render_top_to_bottom() {
        let (state, _) = state_with(&[RED, BLUE]);
        let image = render(&state);

        // First photo at y 16..116, second at y 132..232
        assert_eq!(*image.get_pixel(100, 60), RED);
        assert_eq!(*image.get_pixel(100, 180), BLUE);
        // Gap between them is card
        assert_eq!(*image.get_pixel(100, 124), WHITE);
    }

    #[test]
    fn test_filter_applies_uniformly_without_touching_sources() {
        let (mut state, sources) = state_with(&[RED, BLUE]);
        state.set_filter(StripFilter::Grayscale);
        let image = render(&state);

        for (y, source) in [(60, &sources[0]), (180, &sources[1])] {
            let expected = StripFilter::Grayscale.transform().apply(*source.get_pixel(0, 0));
            let pixel = image.get_pixel(100, y);
            assert_eq!(*pixel, expected);
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
        }

        // Stored pixels are untouched
        assert_eq!(*sources[0].get_pixel(0, 0), RED);
        assert_eq!(*sources[1].get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_strip_color_only_changes_band() {
        let (mut state, _) = state_with(&[RED]);
        state.set_caption("hello there");
        let before = render(&state);

        state.set_strip_color("#3366cc");
        let after = render(&state);

        assert_eq!(before.dimensions(), after.dimensions());
        for (x, y, pixel) in after.enumerate_pixels() {
            if x < 20 {
                assert_eq!(*pixel, Rgba([0x33, 0x66, 0xcc, 255]));
            } else {
                assert_eq!(pixel, before.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_placeholders() {
        let (mut state, _) = state_with(&[]);
        let generation = state.select_images(vec!["a.png".into(), "b.png".into()]);
        state.attach_loaded(
            generation,
            vec![PhotoStatus::Pending, PhotoStatus::Broken("bad".to_string())],
        );
        let image = render(&state);
        let style = StripStyle::default();

        assert_eq!(*image.get_pixel(100, 50), style.pending_rgba());
        assert_eq!(*image.get_pixel(100, 16 + 192 + 16 + 50), style.broken_rgba());
    }

    #[test]
    fn test_transparent_photo_blends_onto_card() {
        let (mut state, _) = state_with(&[]);
        let generation = state.select_images(vec!["clear.png".into()]);
        let clear = Arc::new(RgbaImage::from_pixel(256, 10, Rgba([0, 0, 0, 0])));
        state.attach_loaded(generation, vec![PhotoStatus::Ready(clear)]);

        let image = render(&state);
        assert_eq!(*image.get_pixel(100, 20), WHITE);
    }

    #[test]
    fn test_blend_pixel_clips() {
        let mut canvas = RgbaImage::from_pixel(2, 2, WHITE);
        blend_pixel(&mut canvas, -1, 0, Rgba([0, 0, 0, 255]), 1.0);
        blend_pixel(&mut canvas, 2, 2, Rgba([0, 0, 0, 255]), 1.0);
        assert!(canvas.pixels().all(|p| *p == WHITE));

        blend_pixel(&mut canvas, 1, 1, Rgba([0, 0, 0, 255]), 0.5);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([128, 128, 128, 255]));
    }
}
