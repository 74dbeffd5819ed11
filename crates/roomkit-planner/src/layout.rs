//! Grid placement and bounds clamping.
//!
//! Pure geometry, no store access. `grid_positions` lays item centers out
//! in a row-major columns x rows arrangement inside wall bounds, with the
//! leftover span split into equal gaps. `clamp_to_bounds` constrains a
//! single user-placed item so its footprint keeps a margin from the walls.
//! Grid-placed items are authoritative and must never be clamped.

use roomkit_core::{Bounds, Point};

/// Minimum distance a user-placed item's footprint keeps from wall bounds (mm).
pub const DEFAULT_CLAMP_MARGIN_MM: f64 = 50.0;

/// Parameters for a columns x rows grid arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayoutParams {
    /// Number of columns, >= 1
    pub columns: u32,
    /// Number of rows, >= 1
    pub rows: u32,
}

impl GridLayoutParams {
    /// Create new grid layout parameters.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Validate parameters.
    pub fn is_valid(&self) -> bool {
        self.columns >= 1 && self.rows >= 1
    }

    /// Total number of cells in the grid.
    pub fn capacity(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Computes `item_count` center positions for a grid inside `bounds`.
///
/// The horizontal leftover span `width - columns*item_width` is split into
/// `columns + 1` equal gaps (for a single column this degenerates to two
/// equal outer margins), and analogously for rows. Item `i` occupies
/// `row = i / columns`, `col = i % columns`, row-major.
///
/// Precondition: `item_count <= columns * rows`. The caller clamps; a
/// violating count wraps into undefined placement rather than erroring.
/// Negative leftover span (an infeasible request) is not clamped either -
/// the caller accepts the resulting overlap.
pub fn grid_positions(
    item_count: usize,
    item_width: f64,
    item_height: f64,
    bounds: &Bounds,
    params: GridLayoutParams,
) -> Vec<Point> {
    debug_assert!(params.is_valid(), "grid params must be >= 1x1");
    debug_assert!(
        item_count as u32 <= params.capacity(),
        "item_count {} exceeds grid capacity {}",
        item_count,
        params.capacity()
    );

    let columns = params.columns.max(1) as f64;
    let rows = params.rows.max(1) as f64;

    let gap_x = (bounds.width() - columns * item_width) / (columns + 1.0);
    let gap_y = (bounds.height() - rows * item_height) / (rows + 1.0);

    (0..item_count)
        .map(|i| {
            let col = (i as u32 % params.columns) as f64;
            let row = (i as u32 / params.columns) as f64;
            Point::new(
                bounds.min_x + gap_x + col * (item_width + gap_x) + item_width / 2.0,
                bounds.min_y + gap_y + row * (item_height + gap_y) + item_height / 2.0,
            )
        })
        .collect()
}

/// Constrains an item center so its `width` x `height` footprint stays
/// inside `bounds` shrunk by `margin` on every side. When the shrunk
/// interior is smaller than the item along an axis, the item is centered
/// on that axis instead.
pub fn clamp_to_bounds(
    center: Point,
    width: f64,
    height: f64,
    bounds: &Bounds,
    margin: f64,
) -> Point {
    let interior = bounds.shrink(margin);

    let clamp_axis = |value: f64, half: f64, lo: f64, hi: f64| -> f64 {
        if hi - lo < half * 2.0 {
            // Interior too small for the item: center it.
            (lo + hi) / 2.0
        } else {
            value.max(lo + half).min(hi - half)
        }
    };

    Point::new(
        clamp_axis(center.x, width / 2.0, interior.min_x, interior.max_x),
        clamp_axis(center.y, height / 2.0, interior.min_y, interior.max_y),
    )
}
