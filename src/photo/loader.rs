//! Selected photo loader
//!
//! Decodes the files picked in the upload dialog into display-sized RGBA
//! pixels. Decoding is CPU-bound, so it runs on tokio's blocking pool and
//! the UI thread only ever sees finished results.

use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

use crate::error::{PhotoboothError, Result};
use crate::state::data::PhotoStatus;

/// Extensions offered by the upload dialog's "Images" filter
///
/// Advisory only: whatever the user picks is still attempted.
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga",
];

/// Tallest photo the strip will hold
///
/// Extreme portrait images are shrunk to this height (and narrowed to keep
/// their aspect ratio) so one odd file cannot blow up the strip bitmap.
pub const MAX_DISPLAY_HEIGHT: u32 = 4096;

/// Decode a selection, one status per path, in selection order
///
/// Files that cannot be decoded come back as `PhotoStatus::Broken`.
pub async fn load_photos(paths: Vec<PathBuf>, display_width: u32) -> Vec<PhotoStatus> {
    let count = paths.len();

    // Spawn blocking because decoding and resampling are CPU-intensive
    match task::spawn_blocking(move || load_photos_blocking(&paths, display_width)).await {
        Ok(results) => results,
        Err(e) => {
            log::warn!("⚠️  Photo decode task failed: {}", e);
            vec![PhotoStatus::Broken(e.to_string()); count]
        }
    }
}

/// Blocking implementation of selection loading
fn load_photos_blocking(paths: &[PathBuf], display_width: u32) -> Vec<PhotoStatus> {
    paths
        .iter()
        .map(|path| match decode_photo(path, display_width) {
            Ok(pixels) => {
                log::debug!(
                    "Decoded {} at {}x{}",
                    path.display(),
                    pixels.width(),
                    pixels.height()
                );
                PhotoStatus::Ready(Arc::new(pixels))
            }
            Err(e) => {
                log::warn!("⚠️  {}", e);
                PhotoStatus::Broken(e.to_string())
            }
        })
        .collect()
}

/// Decode one file, apply its EXIF orientation and scale it to `display_width`
pub fn decode_photo(path: &Path, display_width: u32) -> Result<RgbaImage> {
    let decoded = decode_oriented(path).map_err(|source| PhotoboothError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(scale_to_width(&decoded.to_rgba8(), display_width))
}

fn decode_oriented(path: &Path) -> ImageResult<DynamicImage> {
    // Sniff the content rather than trusting the extension
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;

    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    Ok(image)
}

/// Resize to a fixed width, keeping the aspect ratio (never below 1px tall)
///
/// Results taller than `MAX_DISPLAY_HEIGHT` are fitted to that height
/// instead and come out narrower than `width`.
pub fn scale_to_width(image: &RgbaImage, width: u32) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 || width == 0 {
        return RgbaImage::new(width.max(1), 1);
    }

    let aspect = image.height() as f64 / image.width() as f64;
    let height = (aspect * width as f64).round();

    let (width, height) = if height > MAX_DISPLAY_HEIGHT as f64 {
        let narrowed = (MAX_DISPLAY_HEIGHT as f64 / aspect).round() as u32;
        (narrowed.clamp(1, width), MAX_DISPLAY_HEIGHT)
    } else {
        (width, (height as u32).max(1))
    };

    imageops::resize(image, width, height, FilterType::Lanczos3)
}
