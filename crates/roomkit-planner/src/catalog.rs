//! Default furniture footprints.
//!
//! When a plan item names a furniture kind without explicit dimensions, the
//! materializer takes the footprint from this table. Sizes are typical
//! event-rental dimensions in millimeters.

/// Generic footprint for unrecognized kinds (mm).
pub const GENERIC_FOOTPRINT_MM: (f64, f64) = (600.0, 600.0);

/// Returns the default `(width, height)` footprint in millimeters for a
/// furniture kind. Matching is case-insensitive and tolerant of `_`/`-`/
/// space separators; unknown kinds get [`GENERIC_FOOTPRINT_MM`].
pub fn footprint(kind: &str) -> (f64, f64) {
    let key: String = kind
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();

    match key.as_str() {
        "round-table" | "table-round" => (1800.0, 1800.0),
        "rect-table" | "table" | "banquet-table" => (1800.0, 800.0),
        "cocktail-table" | "highboy" => (800.0, 800.0),
        "chair" => (500.0, 500.0),
        "armchair" => (700.0, 700.0),
        "sofa" => (2000.0, 900.0),
        "stage" | "stage-deck" => (2400.0, 1200.0),
        "bar" => (2000.0, 600.0),
        "dance-floor" => (4000.0, 4000.0),
        "podium" | "lectern" => (600.0, 450.0),
        "projector-screen" | "screen" => (2400.0, 200.0),
        "plant" => (400.0, 400.0),
        _ => GENERIC_FOOTPRINT_MM,
    }
}
