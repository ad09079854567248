//! Device profiles, their default variable maps, and the variable merge

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tables::Namespace;
use crate::units;

/// Longest raw value accepted by [`merge`]
pub const MAX_RAW_VALUE_CHARS: usize = 80;

/// A viewport class / orientation / size combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKey {
    DesktopWide,
    Desktop,
    TabletLandscape,
    TabletPortrait,
    MobileLandscape,
    MobilePortrait,
}

impl ProfileKey {
    pub const ALL: [ProfileKey; 6] = [
        ProfileKey::DesktopWide,
        ProfileKey::Desktop,
        ProfileKey::TabletLandscape,
        ProfileKey::TabletPortrait,
        ProfileKey::MobileLandscape,
        ProfileKey::MobilePortrait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileKey::DesktopWide => "desktop-wide",
            ProfileKey::Desktop => "desktop",
            ProfileKey::TabletLandscape => "tablet-landscape",
            ProfileKey::TabletPortrait => "tablet-portrait",
            ProfileKey::MobileLandscape => "mobile-landscape",
            ProfileKey::MobilePortrait => "mobile-portrait",
        }
    }

    /// Human readable label for the editor's profile picker
    pub fn label(self) -> &'static str {
        match self {
            ProfileKey::DesktopWide => "Desktop (wide)",
            ProfileKey::Desktop => "Desktop",
            ProfileKey::TabletLandscape => "Tablet, landscape",
            ProfileKey::TabletPortrait => "Tablet, portrait",
            ProfileKey::MobileLandscape => "Phone, landscape",
            ProfileKey::MobilePortrait => "Phone, portrait",
        }
    }

    fn is_mobile(self) -> bool {
        matches!(self, ProfileKey::MobileLandscape | ProfileKey::MobilePortrait)
    }

    fn is_portrait(self) -> bool {
        matches!(self, ProfileKey::TabletPortrait | ProfileKey::MobilePortrait)
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown device profile '{}'", s))
    }
}

/// Registry entry as exposed to the editor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub key: ProfileKey,
    pub label: &'static str,
}

/// All profiles in picker order
pub fn profiles() -> Vec<ProfileInfo> {
    ProfileKey::ALL
        .into_iter()
        .map(|key| ProfileInfo {
            key,
            label: key.label(),
        })
        .collect()
}

/// Numeric defaults for one namespace and profile
fn default_numbers(ns: Namespace, profile: ProfileKey) -> Vec<(&'static str, f64)> {
    let mobile = profile.is_mobile();
    let portrait = profile.is_portrait();
    let scale = match profile {
        ProfileKey::DesktopWide => 1.15,
        ProfileKey::Desktop => 1.0,
        ProfileKey::TabletLandscape => 0.9,
        ProfileKey::TabletPortrait => 0.8,
        ProfileKey::MobileLandscape => 0.7,
        ProfileKey::MobilePortrait => 0.6,
    };

    let mut values = match ns {
        Namespace::Device => vec![
            ("layout-shelf-top", if portrait { 18.0 } else { 12.0 }),
            ("layout-shelf-height", if portrait { 56.0 } else { 70.0 }),
            ("layout-book-scale", scale),
            ("layout-gutter", if mobile { 0.75 } else { 1.5 }),
            ("layout-title-offset", 20.0),
            ("layout-hotspot-font", if mobile { 3.2 } else { 1.4 }),
        ],
        Namespace::Home => vec![
            ("home-hotspot-x", 50.0),
            ("home-hotspot-y", if portrait { 72.0 } else { 64.0 }),
            ("home-hotspot-font", if mobile { 3.6 } else { 1.6 }),
            ("home-hotspot-scale", scale),
            ("home-hero-height", if mobile { 60.0 } else { 80.0 }),
        ],
        Namespace::Nav => vec![
            ("nav-prev-x", if mobile { 8.0 } else { 4.0 }),
            ("nav-prev-y", 50.0),
            ("nav-next-x", if mobile { 92.0 } else { 96.0 }),
            ("nav-next-y", 50.0),
            ("nav-arrow-size", if mobile { 32.0 } else { 48.0 }),
            ("nav-arrow-scale", 1.0),
        ],
        Namespace::Login => vec![
            ("login-insert-x", 50.0),
            ("login-insert-y", if portrait { 40.0 } else { 45.0 }),
            ("login-insert-width", if mobile { 90.0 } else { 40.0 }),
            ("login-popup-width", if mobile { 320.0 } else { 480.0 }),
            ("login-popup-offset", 8.0),
            ("login-popup-scale", 1.0),
        ],
    };

    // Desktop-only variables stay out of the mobile whitelists.
    if !mobile {
        match ns {
            Namespace::Device => values.push((
                "layout-canvas-max-width",
                if profile == ProfileKey::DesktopWide {
                    1920.0
                } else {
                    1280.0
                },
            )),
            Namespace::Home => values.push(("home-hotspot-gap", 1.25)),
            Namespace::Nav => values.push(("nav-edge-inset", 2.0)),
            Namespace::Login => {}
        }
    }
    values
}

/// Complete default variable map for a profile; its key set is the profile's whitelist
pub fn defaults(ns: Namespace, profile: ProfileKey) -> BTreeMap<String, String> {
    default_numbers(ns, profile)
        .into_iter()
        .filter_map(|(name, value)| {
            let spec = ns.field(name)?;
            Some((name.to_string(), units::format(spec.unit, value)))
        })
        .collect()
}

/// Merge raw overrides onto a profile's defaults.
///
/// Keys outside the profile's whitelist are dropped, values must be short
/// non-empty strings, and each value is parsed in its declared unit and
/// clamped. The result always has exactly the default key set.
pub fn merge(ns: Namespace, profile: ProfileKey, raw: &Value) -> BTreeMap<String, String> {
    let mut merged = defaults(ns, profile);
    let Some(overrides) = raw.as_object() else {
        return merged;
    };

    for (name, value) in overrides {
        let Some(slot) = merged.get_mut(name) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            continue;
        };
        if text.trim().is_empty() || text.chars().count() > MAX_RAW_VALUE_CHARS {
            continue;
        }
        let Some(spec) = ns.field(name) else {
            continue;
        };
        if let Some(parsed) = units::parse(spec.unit, text) {
            *slot = units::format(spec.unit, spec.bounds.clamp(parsed));
        }
    }
    merged
}

/// Numeric value of a variable in a merged map
pub fn number_of(ns: Namespace, vars: &BTreeMap<String, String>, name: &str) -> Option<f64> {
    let spec = ns.field(name)?;
    units::parse(spec.unit, vars.get(name)?)
}
