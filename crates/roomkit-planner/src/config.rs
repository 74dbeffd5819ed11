//! Planner configuration.

use roomkit_core::{Bounds, Point};
use serde::{Deserialize, Serialize};

use crate::layout::DEFAULT_CLAMP_MARGIN_MM;

/// Tunable constants for plan application.
///
/// The canvas dimensions only matter when a plan has no walls: they anchor
/// the fallback tiling and give `align`'s `canvas` reference something to
/// align against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Minimum distance a user-placed item keeps from wall bounds (mm).
    pub clamp_margin_mm: f64,
    /// Workspace canvas width used when no walls exist (mm).
    pub canvas_width_mm: f64,
    /// Workspace canvas height used when no walls exist (mm).
    pub canvas_height_mm: f64,
    /// Columns per row in the fallback tiling.
    pub fallback_tile_columns: u32,
    /// Offset between fallback tiling slots (mm).
    pub fallback_tile_offset_mm: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            clamp_margin_mm: DEFAULT_CLAMP_MARGIN_MM,
            canvas_width_mm: 10000.0,
            canvas_height_mm: 8000.0,
            fallback_tile_columns: 3,
            fallback_tile_offset_mm: 200.0,
        }
    }
}

impl PlannerConfig {
    /// The canvas extent as a bounding box anchored at the origin.
    pub fn canvas_bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.canvas_width_mm, self.canvas_height_mm)
    }

    /// Center of the canvas, the anchor for fallback tiling.
    pub fn canvas_center(&self) -> Point {
        self.canvas_bounds().center()
    }
}
