//! Window widgets
//!
//! - `controls.rs` - the row of strip controls
//! - `fade.rs` - entry fade of the strip preview

pub mod controls;
pub mod fade;
