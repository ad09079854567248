//! Persistence adapter
//!
//! Maps normalized entities to keyed storage rows and back. Every load path
//! re-normalizes whatever the store returns, so corrupt or partial rows
//! never reach a caller unclamped. Writes negotiate between the current and
//! legacy table shapes (see [`crate::store::schema`]).

pub mod pages;
pub mod repository;

use serde::Serialize;

pub use pages::{validate_page_key, CreatePage, CreatedPage, PageRecord, RESERVED_PAGE_KEYS};
pub use repository::LayoutRepository;

/// Where a loaded layout came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutSource {
    /// Nothing stored; normalizer defaults
    #[serde(rename = "default")]
    Default,
    /// Page-level row
    #[serde(rename = "supabase")]
    Stored,
    /// Profile-specific row
    #[serde(rename = "supabase-profile")]
    StoredProfile,
    /// Page-level row used because the profile row was missing or unreadable
    #[serde(rename = "supabase-fallback")]
    StoredFallback,
}

/// Result of a load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loaded<T> {
    pub layout: T,
    pub source: LayoutSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Loaded<T> {
    pub fn new(layout: T, source: LayoutSource) -> Self {
        Self {
            layout,
            source,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Saved<T> {
    pub saved: bool,
    pub layout: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Saved<T> {
    pub fn new(layout: T, warning: Option<String>) -> Self {
        Self {
            saved: true,
            layout,
            warning,
        }
    }
}
