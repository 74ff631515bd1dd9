//! State management module
//!
//! This module holds everything the photobooth window knows about the
//! strip being built:
//! - The strip state and its setters (strip.rs)
//! - Transient photo handles (data.rs)
//! - The fixed filter set (filter.rs)

pub mod data;
pub mod filter;
pub mod strip;
