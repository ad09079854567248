//! Page keys and page creation requests

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Keys that collide with application routes
pub const RESERVED_PAGE_KEYS: &[&str] = &[
    "admin", "api", "login", "logout", "auth", "static", "assets", "new", "edit", "settings",
    "home",
];

const MIN_KEY_CHARS: usize = 2;
const MAX_KEY_CHARS: usize = 40;

/// Check a page key: 2-40 chars of lowercase ASCII letters, digits and
/// hyphens, no leading or trailing hyphen, not reserved
pub fn validate_page_key(key: &str) -> Result<(), LayoutError> {
    let len = key.chars().count();
    if !(MIN_KEY_CHARS..=MAX_KEY_CHARS).contains(&len) {
        return Err(LayoutError::invalid(
            "key",
            format!("must be {}-{} characters", MIN_KEY_CHARS, MAX_KEY_CHARS),
        ));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(LayoutError::invalid(
            "key",
            "only lowercase letters, digits and '-' are allowed",
        ));
    }
    if key.starts_with('-') || key.ends_with('-') {
        return Err(LayoutError::invalid("key", "must not start or end with '-'"));
    }
    if RESERVED_PAGE_KEYS.contains(&key) {
        return Err(LayoutError::invalid("key", format!("'{}' is reserved", key)));
    }
    Ok(())
}

/// Body of a create-page request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Existing shelf page whose geometry is copied
    #[serde(default)]
    pub clone_from: Option<String>,
}

/// A created page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub key: String,
    pub label: String,
    pub path: String,
}

/// Response to a successful create-page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPage {
    pub created: bool,
    pub page: PageRecord,
    /// Set when the cloned shelf was saved without a missing optional column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for key in ["ab", "short-stories", "poems-2024", "a".repeat(40).as_str()] {
            assert!(validate_page_key(key).is_ok(), "{} should be valid", key);
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["a", "", "Poems", "poems!", "-poems", "poems-", "über", "a".repeat(41).as_str()] {
            assert!(validate_page_key(key).is_err(), "{} should be rejected", key);
        }
    }

    #[test]
    fn test_reserved_key_rejected() {
        let err = validate_page_key("admin").unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
