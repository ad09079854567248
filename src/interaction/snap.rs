//! Guide snapping for dragged coordinates

/// Guide lines, in percent of the reference frame
pub const GUIDES: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Default snapping distance, in percent
pub const DEFAULT_THRESHOLD: f64 = 1.5;

/// Snap `value` to the nearest guide when it lies within `threshold`.
///
/// Runs before clamping, so a snapped value may still be pulled back in
/// by the normalizer.
pub fn snap(value: f64, threshold: f64) -> f64 {
    GUIDES
        .iter()
        .map(|guide| (guide, (value - guide).abs()))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(value, |(guide, _)| *guide)
}
