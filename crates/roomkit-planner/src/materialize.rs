//! Entity materialization.
//!
//! Turns the normalized creation sections of a plan into workspace
//! entities: walls first (they establish the bounds everything else is
//! placed against), then furniture, then shapes. Furniture placement
//! distinguishes user-specified coordinates (clamp-checked against wall
//! bounds) from auto-computed ones (grid-placed, authoritative, never
//! clamped). Re-applying an identical plan duplicates entities by design.

use roomkit_core::{normalize_rotation, Bounds, Point};
use tracing::{debug, warn};

use crate::catalog;
use crate::config::PlannerConfig;
use crate::layout::{clamp_to_bounds, grid_positions, GridLayoutParams};
use crate::model::{ShapeKind, Wall, WorkspaceAsset, WorkspaceShape};
use crate::plan::{PlanAsset, PlanShape, PlanWall};
use crate::report::ApplyReport;
use crate::workspace::WorkspaceContext;

/// Creates workspace entities from plan creation sections.
pub struct EntityMaterializer<'a> {
    config: &'a PlannerConfig,
}

impl<'a> EntityMaterializer<'a> {
    /// Creates a materializer over the given configuration.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Appends the plan's walls, validating presence of start, end, and a
    /// positive thickness. Invalid entries are skipped, never fatal.
    pub fn materialize_walls(
        &self,
        walls: &[PlanWall],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        for wall in walls {
            let (Some(sx), Some(sy), Some(ex), Some(ey), Some(thickness)) = (
                wall.start_x,
                wall.start_y,
                wall.end_x,
                wall.end_y,
                wall.thickness,
            ) else {
                warn!("skipping wall entry missing start, end, or thickness");
                report.entries_skipped += 1;
                continue;
            };
            if thickness <= 0.0 {
                warn!(thickness, "skipping wall entry with non-positive thickness");
                report.entries_skipped += 1;
                continue;
            }
            ctx.store.append_wall(Wall::new(
                Point::new(sx, sy),
                Point::new(ex, ey),
                thickness,
                wall.kind.clone(),
            ));
            report.walls_created += 1;
        }
    }

    /// Creates furniture assets from the reconciled list.
    ///
    /// When a grid layout is requested and wall bounds are known, the grid
    /// calculator runs once for the whole auto-placed batch so the
    /// arrangement is coherent; explicitly positioned items keep their
    /// coordinates (clamp-checked) and never consume a grid slot. Without
    /// wall or grid context, auto items fall back to deterministic tiling
    /// around the canvas center.
    pub fn materialize_furniture(
        &self,
        items: &[PlanAsset],
        grid: Option<GridLayoutParams>,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let wall_bounds = ctx.store.wall_bounds();

        // Resolve footprints up front; the grid batch needs them early.
        let footprints: Vec<(f64, f64)> = items
            .iter()
            .map(|item| {
                let (dw, dh) = catalog::footprint(&item.kind);
                (item.width.unwrap_or(dw), item.height.unwrap_or(dh))
            })
            .collect();

        let auto_indices: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.x.is_none() || item.y.is_none())
            .map(|(i, _)| i)
            .collect();

        // One grid invocation for the whole auto batch.
        let mut grid_centers: Vec<Point> = Vec::new();
        if let (Some(params), Some(bounds)) = (grid, wall_bounds) {
            let capacity = params.capacity() as usize;
            let grid_count = auto_indices.len().min(capacity);
            if auto_indices.len() > capacity {
                warn!(
                    requested = auto_indices.len(),
                    capacity,
                    "grid layout capacity exceeded; surplus items fall back to tiling"
                );
                report.diagnostic(format!(
                    "grid layout {}x{} holds {} items but {} were requested; \
                     surplus placed by fallback tiling",
                    params.columns,
                    params.rows,
                    capacity,
                    auto_indices.len()
                ));
            }
            // The batch shares one footprint so spacing stays uniform: the
            // widest and tallest item in the batch.
            let (iw, ih) = auto_indices
                .iter()
                .map(|&i| footprints[i])
                .fold((0.0_f64, 0.0_f64), |(w, h), (iw, ih)| (w.max(iw), h.max(ih)));
            grid_centers = grid_positions(grid_count, iw, ih, &bounds, params);
        }

        let mut auto_slot = 0usize;
        let mut fallback_slot = 0usize;
        for (i, item) in items.iter().enumerate() {
            let (width, height) = footprints[i];

            let center = match (item.x, item.y) {
                (Some(x), Some(y)) => {
                    // User-specified coordinates are always clamp-checked
                    // against wall bounds with margin.
                    match wall_bounds {
                        Some(bounds) => clamp_to_bounds(
                            Point::new(x, y),
                            width,
                            height,
                            &bounds,
                            self.config.clamp_margin_mm,
                        ),
                        None => Point::new(x, y),
                    }
                }
                _ => {
                    // Auto-computed: grid slot if one remains, else tiling.
                    let center = if auto_slot < grid_centers.len() {
                        grid_centers[auto_slot]
                    } else {
                        let p = self.fallback_position(fallback_slot, wall_bounds.as_ref());
                        fallback_slot += 1;
                        p
                    };
                    auto_slot += 1;
                    center
                }
            };

            let mut asset = WorkspaceAsset::new(item.kind.clone(), center.x, center.y, width, height);
            if let Some(rotation) = item.rotation {
                asset.set_rotation(rotation);
            }
            if let Some(fill) = &item.fill_color {
                asset.fill_color = fill.clone();
            }
            if let Some(stroke) = &item.stroke_color {
                asset.stroke_color = stroke.clone();
            }
            let id = ctx.store.append_asset(asset);
            debug!(%id, kind = %item.kind, "created asset");
            report.assets_created += 1;
        }
    }

    /// Creates free-form shapes. No grid logic; rect and circle centers
    /// are clamp-checked like furniture, line endpoints are left alone.
    pub fn materialize_shapes(
        &self,
        shapes: &[PlanShape],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let wall_bounds = ctx.store.wall_bounds();

        for entry in shapes {
            let mut shape = WorkspaceShape::new(entry.kind, entry.x, entry.y);
            shape.width = entry.width;
            shape.height = entry.height;
            shape.radius = entry.radius;
            shape.rotation = normalize_rotation(entry.rotation);
            shape.fill_color = entry.fill_color.clone();
            shape.stroke_color = entry.stroke_color.clone();
            shape.stroke_width = entry.stroke_width;
            shape.z_index = entry.z_index;

            if let Some(bounds) = wall_bounds {
                let (w, h) = match entry.kind {
                    ShapeKind::Rect => (shape.width, shape.height),
                    ShapeKind::Circle => (shape.radius * 2.0, shape.radius * 2.0),
                    ShapeKind::Line => (0.0, 0.0),
                };
                if entry.kind != ShapeKind::Line {
                    let center = clamp_to_bounds(
                        Point::new(shape.x, shape.y),
                        w,
                        h,
                        &bounds,
                        self.config.clamp_margin_mm,
                    );
                    shape.x = center.x;
                    shape.y = center.y;
                }
            }

            ctx.store.append_shape(shape);
            report.shapes_created += 1;
        }
    }

    /// Deterministic default tiling: rows of `fallback_tile_columns`,
    /// successive slots offset by `fallback_tile_offset_mm`, anchored at
    /// the wall-bounds center when walls exist and at the canvas center
    /// otherwise. Rooms are not required to sit at the canvas origin, so
    /// the anchor must follow the walls.
    fn fallback_position(&self, slot: usize, wall_bounds: Option<&Bounds>) -> Point {
        let columns = self.config.fallback_tile_columns.max(1) as usize;
        let col = (slot % columns) as f64;
        let row = (slot / columns) as f64;
        let center = wall_bounds
            .map(Bounds::center)
            .unwrap_or_else(|| self.config.canvas_center());
        let offset = self.config.fallback_tile_offset_mm;
        Point::new(
            center.x + (col - (columns as f64 - 1.0) / 2.0) * offset,
            center.y + row * offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanWall;

    fn plan_asset(kind: &str) -> PlanAsset {
        PlanAsset {
            kind: kind.to_string(),
            x: None,
            y: None,
            width: None,
            height: None,
            rotation: None,
            fill_color: None,
            stroke_color: None,
        }
    }

    #[test]
    fn wall_validation_skips_incomplete_entries() {
        let config = PlannerConfig::default();
        let materializer = EntityMaterializer::new(&config);
        let mut ctx = WorkspaceContext::new();
        let mut report = ApplyReport::new();

        let walls = vec![
            PlanWall {
                start_x: Some(0.0),
                start_y: Some(0.0),
                end_x: Some(10000.0),
                end_y: Some(0.0),
                thickness: Some(100.0),
                kind: "exterior".to_string(),
            },
            PlanWall {
                start_x: Some(0.0),
                start_y: Some(0.0),
                end_x: None,
                end_y: None,
                thickness: Some(100.0),
                kind: "exterior".to_string(),
            },
        ];
        materializer.materialize_walls(&walls, &mut ctx, &mut report);
        assert_eq!(report.walls_created, 1);
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(ctx.store.walls().len(), 1);
    }

    #[test]
    fn fallback_tiling_is_rows_of_three_around_center() {
        let config = PlannerConfig::default();
        let materializer = EntityMaterializer::new(&config);
        let mut ctx = WorkspaceContext::new();
        let mut report = ApplyReport::new();

        let items: Vec<PlanAsset> = (0..4).map(|_| plan_asset("chair")).collect();
        materializer.materialize_furniture(&items, None, &mut ctx, &mut report);

        let assets = ctx.store.assets();
        assert_eq!(assets.len(), 4);
        // Centered row of three, then the next row starts below.
        assert_eq!((assets[0].x, assets[0].y), (4800.0, 4000.0));
        assert_eq!((assets[1].x, assets[1].y), (5000.0, 4000.0));
        assert_eq!((assets[2].x, assets[2].y), (5200.0, 4000.0));
        assert_eq!((assets[3].x, assets[3].y), (4800.0, 4200.0));
    }

    #[test]
    fn fallback_tiling_follows_wall_bounds_away_from_origin() {
        // A room nowhere near the canvas origin: auto items without a grid
        // must still land inside it.
        let config = PlannerConfig::default();
        let materializer = EntityMaterializer::new(&config);
        let mut ctx = WorkspaceContext::new();
        let mut report = ApplyReport::new();

        let walls = vec![PlanWall {
            start_x: Some(20000.0),
            start_y: Some(20000.0),
            end_x: Some(30000.0),
            end_y: Some(28000.0),
            thickness: Some(100.0),
            kind: "exterior".to_string(),
        }];
        materializer.materialize_walls(&walls, &mut ctx, &mut report);

        materializer.materialize_furniture(&[plan_asset("chair")], None, &mut ctx, &mut report);

        let bounds = ctx.store.wall_bounds().unwrap();
        let chair = &ctx.store.assets()[0];
        assert!(bounds.contains(&chair.center()), "chair at ({}, {})", chair.x, chair.y);
        assert_eq!((chair.x, chair.y), (24800.0, 24000.0));
    }

    #[test]
    fn explicit_coordinates_never_consume_grid_slots() {
        let config = PlannerConfig::default();
        let materializer = EntityMaterializer::new(&config);
        let mut ctx = WorkspaceContext::new();
        let mut report = ApplyReport::new();

        let walls = vec![PlanWall {
            start_x: Some(0.0),
            start_y: Some(0.0),
            end_x: Some(10000.0),
            end_y: Some(8000.0),
            thickness: Some(100.0),
            kind: "exterior".to_string(),
        }];
        materializer.materialize_walls(&walls, &mut ctx, &mut report);

        let mut pinned = plan_asset("chair");
        pinned.x = Some(1000.0);
        pinned.y = Some(1000.0);
        pinned.width = Some(700.0);
        pinned.height = Some(700.0);
        let mut auto = plan_asset("chair");
        auto.width = Some(700.0);
        auto.height = Some(700.0);

        materializer.materialize_furniture(
            &[pinned, auto],
            Some(GridLayoutParams::new(1, 1)),
            &mut ctx,
            &mut report,
        );

        let assets = ctx.store.assets();
        assert_eq!((assets[0].x, assets[0].y), (1000.0, 1000.0));
        // The auto item takes the single grid cell: centered in the hall.
        assert_eq!((assets[1].x, assets[1].y), (5000.0, 4000.0));
    }
}
