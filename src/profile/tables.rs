//! Clamp tables for profile layout variables
//!
//! Each namespace owns one table mapping a variable name to its unit and
//! range. Names are unique across all tables, so a name alone identifies
//! its unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::units::Unit;

/// Unit and range of one layout variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub unit: Unit,
    pub bounds: Bounds,
}

const fn spec(unit: Unit, min: f64, max: f64) -> FieldSpec {
    FieldSpec {
        unit,
        bounds: Bounds::new(min, max),
    }
}

/// Independent variable namespaces sharing the merge algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Generic device layout
    Device,
    /// Home page hotspot layout
    Home,
    /// Shelf navigation arrows
    Nav,
    /// Login page insert and popup
    Login,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Device,
        Namespace::Home,
        Namespace::Nav,
        Namespace::Login,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Device => "device",
            Namespace::Home => "home",
            Namespace::Nav => "nav",
            Namespace::Login => "login",
        }
    }

    /// The clamp table for this namespace
    pub fn table(self) -> &'static [(&'static str, FieldSpec)] {
        match self {
            Namespace::Device => DEVICE_TABLE,
            Namespace::Home => HOME_TABLE,
            Namespace::Nav => NAV_TABLE,
            Namespace::Login => LOGIN_TABLE,
        }
    }

    /// Look up a variable in this namespace's table
    pub fn field(self, name: &str) -> Option<FieldSpec> {
        self.table()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, spec)| *spec)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| format!("unknown layout namespace '{}'", s))
    }
}

const DEVICE_TABLE: &[(&str, FieldSpec)] = &[
    ("layout-canvas-max-width", spec(Unit::Px, 320.0, 2400.0)),
    ("layout-shelf-top", spec(Unit::Dvh, 0.0, 60.0)),
    ("layout-shelf-height", spec(Unit::Dvh, 20.0, 100.0)),
    ("layout-book-scale", spec(Unit::Scale, 0.4, 2.5)),
    ("layout-gutter", spec(Unit::Rem, 0.0, 6.0)),
    ("layout-title-offset", spec(Unit::Percent, 0.0, 100.0)),
    ("layout-hotspot-font", spec(Unit::Vw, 0.5, 6.0)),
];

const HOME_TABLE: &[(&str, FieldSpec)] = &[
    ("home-hotspot-x", spec(Unit::Percent, 0.0, 100.0)),
    ("home-hotspot-y", spec(Unit::Percent, 0.0, 100.0)),
    ("home-hotspot-font", spec(Unit::Vw, 0.5, 6.0)),
    ("home-hotspot-gap", spec(Unit::Rem, 0.0, 8.0)),
    ("home-hotspot-scale", spec(Unit::Scale, 0.5, 3.0)),
    ("home-hero-height", spec(Unit::Dvh, 20.0, 100.0)),
];

const NAV_TABLE: &[(&str, FieldSpec)] = &[
    ("nav-prev-x", spec(Unit::Percent, 0.0, 100.0)),
    ("nav-prev-y", spec(Unit::Percent, 0.0, 100.0)),
    ("nav-next-x", spec(Unit::Percent, 0.0, 100.0)),
    ("nav-next-y", spec(Unit::Percent, 0.0, 100.0)),
    ("nav-arrow-size", spec(Unit::Px, 16.0, 160.0)),
    ("nav-arrow-scale", spec(Unit::Scale, 0.5, 3.0)),
    ("nav-edge-inset", spec(Unit::Vw, 0.0, 20.0)),
];

const LOGIN_TABLE: &[(&str, FieldSpec)] = &[
    ("login-insert-x", spec(Unit::Percent, 0.0, 100.0)),
    ("login-insert-y", spec(Unit::Percent, 0.0, 100.0)),
    ("login-insert-width", spec(Unit::Percent, 10.0, 100.0)),
    ("login-popup-width", spec(Unit::Px, 240.0, 960.0)),
    ("login-popup-offset", spec(Unit::Dvh, 0.0, 50.0)),
    ("login-popup-scale", spec(Unit::Scale, 0.5, 2.0)),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique_across_tables() {
        let mut seen = HashSet::new();
        for ns in Namespace::ALL {
            for (name, _) in ns.table() {
                assert!(seen.insert(*name), "'{}' appears in more than one table", name);
            }
        }
    }

    #[test]
    fn test_ranges_are_ordered() {
        for ns in Namespace::ALL {
            for (name, spec) in ns.table() {
                assert!(spec.bounds.min < spec.bounds.max, "bad range for {}", name);
            }
        }
    }

    #[test]
    fn test_namespace_parse() {
        assert_eq!("nav".parse::<Namespace>(), Ok(Namespace::Nav));
        assert!("shelf".parse::<Namespace>().is_err());
    }
}
