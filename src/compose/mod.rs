//! Strip composition module
//!
//! Architecture:
//! - `style.rs` - layout constants and their config file
//! - `layout.rs` - pure state -> layout derivation
//! - `text.rs` - caption measuring, wrapping and glyph drawing
//! - `raster.rs` - layout -> RGBA bitmap
//!
//! The on-screen preview and the exported PNG come from the same
//! rasterizer, so what you see is what you download.

pub mod layout;
pub mod raster;
pub mod style;
pub mod text;

pub use layout::StripLayout;
pub use raster::rasterize;
pub use style::StripStyle;
pub use text::Typesetter;
