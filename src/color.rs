//! Color utilities
//!
//! This module handles:
//! - Parsing strip colors from the hex strings the color picker produces
//! - Converting picker colors back to hex
//! - CSS filter functions (grayscale, sepia, saturate, brightness, contrast)
//!   expressed as color transforms over 8-bit sRGB pixels
//!
//! The filter math follows the CSS Filter Effects shorthand definitions,
//! which operate directly on sRGB values in the 0.0-1.0 range.

use cgmath::{Matrix3, SquareMatrix, Vector3};
use image::Rgba;

/// Default strip color (black)
pub const DEFAULT_STRIP_COLOR: &str = "#000000";

/// Parse `#rrggbb` or `#rgb` into an opaque RGBA pixel
///
/// Returns `None` for anything else. The leading `#` is optional.
pub fn parse_hex(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgba([r, g, b, 255]))
        }
        3 => {
            // Short form: each digit is doubled (#f80 -> #ff8800)
            let mut channels = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let digit = c.to_digit(16)? as u8;
                channels[i] = digit * 17;
            }
            Some(Rgba([channels[0], channels[1], channels[2], 255]))
        }
        _ => None,
    }
}

/// Format a picker color as a lowercase `#rrggbb` string
pub fn to_hex(color: iced::Color) -> String {
    let [r, g, b, _] = color.into_rgba8();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Convert a hex string into a picker color, falling back to black
pub fn to_iced(value: &str) -> iced::Color {
    let Rgba([r, g, b, _]) = parse_hex(value).unwrap_or(Rgba([0, 0, 0, 255]));
    iced::Color::from_rgb8(r, g, b)
}

/// A per-pixel color transform: `out = clamp(matrix * rgb * scale + offset)`
///
/// Every supported CSS filter function fits this shape:
/// - grayscale / sepia / saturate use the matrix
/// - brightness uses the scale
/// - contrast uses scale and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    pub matrix: Matrix3<f32>,
    pub scale: f32,
    pub offset: f32,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// `grayscale(amount)`, amount clamped to 0.0-1.0
    pub fn grayscale(amount: f32) -> Self {
        let a = 1.0 - amount.clamp(0.0, 1.0);
        Self::from_matrix(from_rows([
            [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
            [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
            [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
        ]))
    }

    /// `sepia(amount)`, amount clamped to 0.0-1.0
    pub fn sepia(amount: f32) -> Self {
        let a = 1.0 - amount.clamp(0.0, 1.0);
        Self::from_matrix(from_rows([
            [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
            [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
            [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
        ]))
    }

    /// `saturate(amount)`, amount must be non-negative
    pub fn saturate(amount: f32) -> Self {
        let s = amount.max(0.0);
        Self::from_matrix(from_rows([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ]))
    }

    /// `brightness(amount)`: linear multiplier
    pub fn brightness(amount: f32) -> Self {
        Self {
            matrix: Matrix3::identity(),
            scale: amount.max(0.0),
            offset: 0.0,
        }
    }

    /// `contrast(amount)`: scales around mid-gray
    pub fn contrast(amount: f32) -> Self {
        let c = amount.max(0.0);
        Self {
            matrix: Matrix3::identity(),
            scale: c,
            offset: 0.5 - 0.5 * c,
        }
    }

    fn from_matrix(matrix: Matrix3<f32>) -> Self {
        Self {
            matrix,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Parse a single CSS filter function such as `sepia(1)` or `contrast(150%)`
    ///
    /// `none` and anything unrecognized map to the identity transform.
    pub fn from_css(css: &str) -> Self {
        let css = css.trim();
        let Some((name, rest)) = css.split_once('(') else {
            return Self::identity();
        };
        let Some(arg) = rest.strip_suffix(')') else {
            return Self::identity();
        };

        let arg = arg.trim();
        let amount = if arg.is_empty() {
            // CSS default when the argument is omitted
            Some(1.0)
        } else if let Some(percent) = arg.strip_suffix('%') {
            percent.trim().parse::<f32>().ok().map(|p| p / 100.0)
        } else {
            arg.parse::<f32>().ok()
        };

        let Some(amount) = amount.filter(|a| a.is_finite() && *a >= 0.0) else {
            return Self::identity();
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "grayscale" => Self::grayscale(amount),
            "sepia" => Self::sepia(amount),
            "saturate" => Self::saturate(amount),
            "brightness" => Self::brightness(amount),
            "contrast" => Self::contrast(amount),
            _ => Self::identity(),
        }
    }

    pub fn is_identity(&self) -> bool {
        const EPSILON: f32 = 0.001;

        let identity = Matrix3::<f32>::identity();
        let matrix_is_identity = (0..3).all(|c| {
            (0..3).all(|r| (self.matrix[c][r] - identity[c][r]).abs() < EPSILON)
        });

        matrix_is_identity
            && (self.scale - 1.0).abs() < EPSILON
            && self.offset.abs() < EPSILON
    }

    /// Apply to one pixel; alpha is passed through untouched
    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let Rgba([r, g, b, a]) = pixel;
        let rgb = Vector3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let offset = Vector3::new(self.offset, self.offset, self.offset);
        let out = self.matrix * rgb * self.scale + offset;

        Rgba([to_channel(out.x), to_channel(out.y), to_channel(out.z), a])
    }
}

/// Build a cgmath matrix from row-major coefficients (cgmath is column-major)
fn from_rows(rows: [[f32; 3]; 3]) -> Matrix3<f32> {
    Matrix3::new(
        rows[0][0], rows[1][0], rows[2][0], // Column 0
        rows[0][1], rows[1][1], rows[2][1], // Column 1
        rows[0][2], rows[1][2], rows[2][2], // Column 2
    )
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
