//! Unit-typed scalar values
//!
//! Layout variables are stored as short strings such as `"26.5%"` or
//! `"1.25rem"`. Each variable name declares exactly one [`Unit`]; parsing
//! accepts either a bare number or a number carrying that unit's suffix.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The measurement unit a scalar is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Percent of the containing frame
    Percent,
    /// CSS pixels
    Px,
    /// Percent of viewport width
    Vw,
    /// Percent of dynamic viewport height
    Dvh,
    /// Root em
    Rem,
    /// Unitless multiplier
    Scale,
}

impl Unit {
    /// Suffix written after the number (empty for [`Unit::Scale`])
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Px => "px",
            Unit::Vw => "vw",
            Unit::Dvh => "dvh",
            Unit::Rem => "rem",
            Unit::Scale => "",
        }
    }

    /// Look up a unit by its suffix literal
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        match suffix.to_ascii_lowercase().as_str() {
            "%" => Some(Unit::Percent),
            "px" => Some(Unit::Px),
            "vw" => Some(Unit::Vw),
            "dvh" => Some(Unit::Dvh),
            "rem" => Some(Unit::Rem),
            "" => Some(Unit::Scale),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Scale => write!(f, "scale"),
            other => write!(f, "{}", other.suffix()),
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse `text` as a value in `unit`.
///
/// Returns `None` for empty input, a foreign suffix, or a non-finite number.
pub fn parse(unit: Unit, text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let split = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);

    // "1e" style leftovers are not numbers; let f64 parsing reject them.
    if !suffix.trim().is_empty() && Unit::from_suffix(suffix.trim()) != Some(unit) {
        return None;
    }

    let value: f64 = number.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Format a value in `unit`, rounded to two decimals without trailing zeros
pub fn format(unit: Unit, value: f64) -> String {
    let rounded = round2(value);
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut number = format!("{:.2}", rounded);
    while number.ends_with('0') {
        number.pop();
    }
    if number.ends_with('.') {
        number.pop();
    }
    format!("{}{}", number, unit.suffix())
}
