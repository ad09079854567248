//! Clamped scalar and rectangle primitives
//!
//! Every entity normalizer in this crate is composed from [`Bounds`] and
//! [`RectBounds`]. Reading a raw JSON field never fails: a missing, mistyped
//! or non-finite value simply yields `None` and the caller substitutes the
//! fallback.

use serde_json::Value;

use super::types::Rect;
use crate::units::round2;

/// Inclusive numeric range for one scalar field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The full percentage range `[0, 100]`
    pub const PERCENT: Bounds = Bounds::new(0.0, 100.0);

    /// Clamp into range and round to two decimals
    pub fn clamp(&self, value: f64) -> f64 {
        round2(value.clamp(self.min, self.max))
    }

    /// Clamp a raw value, or return `fallback` verbatim when the raw value is unusable
    pub fn resolve(&self, raw: Option<f64>, fallback: f64) -> f64 {
        match raw {
            Some(value) => self.clamp(value),
            None => fallback,
        }
    }

    /// Integer variant used for page counts
    pub fn resolve_int(&self, raw: Option<f64>, fallback: u32) -> u32 {
        match raw {
            Some(value) => value.round().clamp(self.min, self.max) as u32,
            None => fallback,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Size bounds for a center-anchored rectangle.
///
/// Sizes are clamped against fixed absolute bounds first; the center is then
/// clamped to `[size/2, 100 - size/2]` using the already-clamped size so the
/// rectangle can never leave its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBounds {
    pub width: Bounds,
    pub height: Bounds,
}

impl RectBounds {
    pub const fn new(width: Bounds, height: Bounds) -> Self {
        Self { width, height }
    }

    /// Resolve a rectangle from independent raw components
    pub fn resolve(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
        fallback: &Rect,
    ) -> Rect {
        let width = self.width.resolve(width, fallback.width);
        let height = self.height.resolve(height, fallback.height);
        Rect {
            x: center_clamp(x.unwrap_or(fallback.x), width),
            y: center_clamp(y.unwrap_or(fallback.y), height),
            width,
            height,
        }
    }

    /// Resolve a rectangle from a JSON object with `x`, `y`, `width`, `height` keys
    pub fn resolve_value(&self, raw: &Value, fallback: &Rect) -> Rect {
        self.resolve(
            number(raw, "x"),
            number(raw, "y"),
            number(raw, "width"),
            number(raw, "height"),
            fallback,
        )
    }

    /// Clamp an already-typed rectangle
    pub fn clamp(&self, rect: &Rect, fallback: &Rect) -> Rect {
        self.resolve(
            finite(rect.x),
            finite(rect.y),
            finite(rect.width),
            finite(rect.height),
            fallback,
        )
    }
}

/// Clamp a center coordinate so that `center ± size/2` stays inside `[0, 100]`
pub fn center_clamp(center: f64, size: f64) -> f64 {
    let half = (size / 2.0).clamp(0.0, 50.0);
    round2(center.clamp(half, 100.0 - half))
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Read a finite number from `raw[key]`.
///
/// JSON numbers and numeric strings are accepted; anything else is `None`.
pub fn number(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(finite),
        _ => None,
    }
}

/// Read a trimmed string from `raw[key]`
pub fn text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)?.as_str().map(|s| s.trim().to_string())
}

/// Read a string from `raw[key]` without trimming (URLs are stored as-is)
pub fn verbatim(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)?.as_str().map(str::to_string)
}

/// Truncate to at most `max` characters on a char boundary
pub fn truncate_chars(value: String, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value,
    }
}
