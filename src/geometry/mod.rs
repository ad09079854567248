//! Geometry entities and their normalizer
//!
//! Every persisted or displayed geometry passes through
//! [`Normalize::normalize`], which clamps each field into its declared range
//! and keeps rectangles inside their parent frame.

pub mod clamp;
pub mod defaults;
pub mod normalize;
pub mod types;

pub use clamp::{Bounds, RectBounds};
pub use defaults::{default_book, default_front_templates, default_hotspot, default_shelf};
pub use normalize::{normalize_books, normalize_cover_window, renormalize, Normalize};
pub use types::*;
