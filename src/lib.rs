//! Layout Studio - geometry and device-profile configuration for a content site
//!
//! This library keeps every administrator-edited layout numerically valid:
//! hotspots, book shelves with their front templates, and per-device layout
//! variables. Untrusted input always passes through a normalizer that clamps
//! each field into range, and storage negotiates between current and legacy
//! table shapes.
//!
//! # Example
//!
//! ```rust
//! use layout_studio::geometry::{default_hotspot, Hotspot, Normalize};
//! use serde_json::json;
//!
//! let hotspot = Hotspot::normalize(&json!({"xPercent": 150}), &default_hotspot("creating"));
//! assert_eq!(hotspot.x_percent, 100.0);
//! assert_eq!(hotspot.y_percent, 18.0);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod interaction;
pub mod persist;
pub mod profile;
pub mod server;
pub mod store;
pub mod units;

pub use config::{ConfigError, StudioConfig};
pub use error::LayoutError;
pub use geometry::{Hotspot, Normalize, ShelfLayout};
pub use persist::{LayoutRepository, LayoutSource, Loaded, Saved};
pub use profile::{Namespace, ProfileKey};
pub use store::{MemoryStore, RowStore, SqliteStore, StoreError};

use std::str::FromStr;

use serde_json::Value;

/// A layout family that can be normalized on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Hotspot,
    Shelf,
    Vars(Namespace),
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotspot" => Ok(Family::Hotspot),
            "shelf" => Ok(Family::Shelf),
            other => other
                .parse::<Namespace>()
                .map(Family::Vars)
                .map_err(|_| format!("unknown layout family '{}'", other)),
        }
    }
}

/// Normalize a raw JSON document as one layout family, against its defaults.
///
/// Hotspot defaults come from the document's `key`; variable maps are merged
/// onto `profile`'s defaults.
pub fn normalize_document(
    family: Family,
    profile: ProfileKey,
    raw: &Value,
) -> Result<Value, serde_json::Error> {
    match family {
        Family::Hotspot => {
            let key = raw.get("key").and_then(Value::as_str).unwrap_or("page");
            let fallback = geometry::default_hotspot(key.trim());
            serde_json::to_value(Hotspot::normalize(raw, &fallback))
        }
        Family::Shelf => {
            serde_json::to_value(ShelfLayout::normalize(raw, &geometry::default_shelf()))
        }
        Family::Vars(ns) => serde_json::to_value(profile::merge(ns, profile, raw)),
    }
}
