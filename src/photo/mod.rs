//! Photo decoding module
//!
//! This module handles:
//! - Decoding selected files off the UI thread
//! - Applying EXIF orientation
//! - Scaling every photo to the strip's display width

pub mod loader;
