//! Unit parsing utilities
//!
//! The workspace is metric-millimeter throughout. Upstream plan producers
//! are sloppy about numeric fields: lengths arrive as numbers, as bare
//! numeric strings, or as strings with a unit suffix. This module owns the
//! lenient string-to-millimeter conversion used by the plan normalizer.

/// Parses a loose length string into millimeters.
///
/// Accepts bare numbers (`"700"`, `" 700.5 "`) and numbers with a unit
/// suffix (`"700mm"`, `"70cm"`, `"0.7m"`, `"27.5in"`). Returns `None` for
/// anything that does not parse to a finite number; callers substitute
/// their documented field default.
pub fn parse_length_mm(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let lower = s.to_lowercase();
    let (number, factor) = if let Some(v) = lower.strip_suffix("mm") {
        (v, 1.0)
    } else if let Some(v) = lower.strip_suffix("cm") {
        (v, 10.0)
    } else if let Some(v) = lower.strip_suffix("in") {
        (v, 25.4)
    } else if let Some(v) = lower.strip_suffix('m') {
        (v, 1000.0)
    } else {
        (lower.as_str(), 1.0)
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value * factor)
}
