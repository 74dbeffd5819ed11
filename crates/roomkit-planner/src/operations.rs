//! Bulk operations.
//!
//! Operations are a tagged union with one payload shape per kind, so a
//! duplicate-typed operation cannot carry alignment-only fields. The
//! executor runs them in plan order against the shared context. Target
//! resolution is uniform: an explicit id list wins, otherwise the current
//! selection is used. The workspace uses screen-style coordinates (y grows
//! downward), so `top` aligns toward smaller y.

use roomkit_core::EntityId;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::model::WorkspaceAsset;
use crate::report::ApplyReport;
use crate::workspace::{RemovedEntity, WorkspaceContext};

/// Alignment edge. `Left`/`Right`/`Center` act on X; `Top`/`Bottom`/
/// `Middle` act on Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignEdge {
    Left,
    Right,
    Center,
    Top,
    Bottom,
    Middle,
}

/// What the alignment edge is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignReference {
    /// The canvas extent (wall bounds when walls exist).
    Canvas,
    /// The combined bounding box of the targets.
    Selection,
    /// The first target's bounding box.
    First,
}

/// Axis for distribute operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Criteria for criteria-based select/deselect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectCriteria {
    /// Matches assets whose kind equals this (case-insensitive).
    pub asset_type: Option<String>,
    /// Matches entities whose fill or stroke color equals this.
    pub color: Option<String>,
    /// Matches entities whose larger footprint dimension is >= this (mm).
    pub min_size: Option<f64>,
    /// Matches entities whose larger footprint dimension is <= this (mm).
    pub max_size: Option<f64>,
}

impl SelectCriteria {
    /// `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.asset_type.is_none()
            && self.color.is_none()
            && self.min_size.is_none()
            && self.max_size.is_none()
    }

    fn matches(&self, kind: Option<&str>, fill: &str, stroke: &str, size: f64) -> bool {
        if let Some(want) = &self.asset_type {
            match kind {
                Some(kind) if kind.eq_ignore_ascii_case(want) => {}
                _ => return false,
            }
        }
        if let Some(color) = &self.color {
            if !fill.eq_ignore_ascii_case(color) && !stroke.eq_ignore_ascii_case(color) {
                return false;
            }
        }
        if let Some(min) = self.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.max_size {
            if size > max {
                return false;
            }
        }
        true
    }
}

/// A bulk, selection-oriented or structural action.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Delete {
        ids: Vec<EntityId>,
        delete_all: bool,
        delete_selected: bool,
    },
    Align {
        edge: AlignEdge,
        relative_to: AlignReference,
        targets: Vec<EntityId>,
    },
    Distribute {
        direction: Direction,
        spacing: Option<f64>,
        targets: Vec<EntityId>,
    },
    Duplicate {
        targets: Vec<EntityId>,
        count: u32,
        offset_x: f64,
        offset_y: f64,
    },
    Group {
        members: Vec<EntityId>,
    },
    Ungroup {
        group: EntityId,
    },
    Select {
        select_all: bool,
        criteria: SelectCriteria,
    },
    Deselect {
        deselect_all: bool,
        criteria: SelectCriteria,
    },
}

/// Executes bulk operations against the workspace context.
pub struct OperationExecutor<'a> {
    config: &'a PlannerConfig,
}

impl<'a> OperationExecutor<'a> {
    /// Creates an executor over the given configuration.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Runs every operation in order.
    pub fn execute(
        &self,
        operations: &[Operation],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        for op in operations {
            self.execute_one(op, ctx, report);
        }
    }

    fn execute_one(&self, op: &Operation, ctx: &mut WorkspaceContext, report: &mut ApplyReport) {
        match op {
            Operation::Delete {
                ids,
                delete_all,
                delete_selected,
            } => self.delete(ids, *delete_all, *delete_selected, ctx, report),
            Operation::Align {
                edge,
                relative_to,
                targets,
            } => self.align(*edge, *relative_to, targets, ctx, report),
            Operation::Distribute {
                direction,
                spacing,
                targets,
            } => self.distribute(*direction, *spacing, targets, ctx, report),
            Operation::Duplicate {
                targets,
                count,
                offset_x,
                offset_y,
            } => self.duplicate(targets, *count, *offset_x, *offset_y, ctx, report),
            Operation::Group { members } => self.group(members, ctx, report),
            Operation::Ungroup { group } => self.ungroup(*group, ctx, report),
            Operation::Select {
                select_all,
                criteria,
            } => self.select(*select_all, criteria, ctx, report),
            Operation::Deselect {
                deselect_all,
                criteria,
            } => self.deselect(*deselect_all, criteria, ctx),
        }
    }

    /// Resolves operation targets: explicit ids that exist as assets, or
    /// the current selection's assets when no ids were supplied.
    fn resolve_asset_targets(
        &self,
        ids: &[EntityId],
        ctx: &WorkspaceContext,
    ) -> SmallVec<[EntityId; 8]> {
        let candidates: SmallVec<[EntityId; 8]> = if ids.is_empty() {
            ctx.selection.current().iter().copied().collect()
        } else {
            ids.iter().copied().collect()
        };
        candidates
            .into_iter()
            .filter(|id| {
                let known = ctx.store.asset(*id).is_some();
                if !known {
                    debug!(id = %id, "operation target is not an asset; skipping");
                }
                known
            })
            .collect()
    }

    fn delete(
        &self,
        ids: &[EntityId],
        delete_all: bool,
        delete_selected: bool,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        if delete_all {
            let (assets, shapes, walls) = ctx.store.clear();
            ctx.selection.clear();
            report.entities_removed += assets + shapes + walls;
            return;
        }

        let mut doomed: SmallVec<[EntityId; 8]> = ids.iter().copied().collect();
        if delete_selected {
            // Expand to the selection at execution time, not plan time.
            for id in ctx.selection.current() {
                if !doomed.contains(id) {
                    doomed.push(*id);
                }
            }
        }

        for id in doomed {
            match ctx.store.remove_by_id(id) {
                Some(removed) => {
                    // A removed group envelope releases its members.
                    if let RemovedEntity::Asset(asset) = &removed {
                        if asset.is_group {
                            ctx.store.clear_group(asset.id);
                        }
                    }
                    ctx.selection.remove(&[id]);
                    report.entities_removed += 1;
                }
                None => {
                    debug!(%id, "delete target not found; skipping");
                    report.entries_skipped += 1;
                }
            }
        }
    }

    fn align(
        &self,
        edge: AlignEdge,
        relative_to: AlignReference,
        targets: &[EntityId],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let targets = self.resolve_asset_targets(targets, ctx);
        if targets.is_empty() {
            debug!("align has no resolvable targets");
            return;
        }

        let reference = match relative_to {
            AlignReference::Canvas => ctx
                .store
                .wall_bounds()
                .unwrap_or_else(|| self.config.canvas_bounds()),
            AlignReference::Selection => {
                let Some(bounds) = targets
                    .iter()
                    .filter_map(|id| ctx.store.asset(*id))
                    .map(|a| a.bounds())
                    .reduce(|acc, b| acc.union(&b))
                else {
                    return;
                };
                bounds
            }
            AlignReference::First => {
                let Some(first) = ctx.store.asset(targets[0]) else {
                    return;
                };
                first.bounds()
            }
        };

        for id in targets {
            let Some(asset) = ctx.store.asset(id) else {
                continue;
            };
            let b = asset.bounds();
            let (dx, dy) = match edge {
                AlignEdge::Left => (reference.min_x - b.min_x, 0.0),
                AlignEdge::Right => (reference.max_x - b.max_x, 0.0),
                AlignEdge::Center => (reference.center().x - asset.x, 0.0),
                AlignEdge::Top => (0.0, reference.min_y - b.min_y),
                AlignEdge::Bottom => (0.0, reference.max_y - b.max_y),
                AlignEdge::Middle => (0.0, reference.center().y - asset.y),
            };
            if dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON {
                ctx.store.update_asset(id, |a| {
                    a.x += dx;
                    a.y += dy;
                });
                report.entities_patched += 1;
            }
        }
    }

    fn distribute(
        &self,
        direction: Direction,
        spacing: Option<f64>,
        targets: &[EntityId],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let targets = self.resolve_asset_targets(targets, ctx);
        if targets.len() < 2 {
            debug!(count = targets.len(), "distribute needs at least two targets");
            return;
        }

        let coordinate = |asset: &WorkspaceAsset| match direction {
            Direction::Horizontal => asset.x,
            Direction::Vertical => asset.y,
        };

        // Existing order is preserved; the first and last targets anchor
        // the span when no explicit spacing is given.
        let (Some(head), Some(tail)) = (
            ctx.store.asset(targets[0]),
            ctx.store.asset(targets[targets.len() - 1]),
        ) else {
            return;
        };
        let first = coordinate(head);
        let step = match spacing {
            Some(s) => s,
            None => (coordinate(tail) - first) / (targets.len() as f64 - 1.0),
        };

        for (i, id) in targets.iter().enumerate() {
            let position = first + step * i as f64;
            ctx.store.update_asset(*id, |a| match direction {
                Direction::Horizontal => a.x = position,
                Direction::Vertical => a.y = position,
            });
            report.entities_patched += 1;
        }
    }

    fn duplicate(
        &self,
        targets: &[EntityId],
        count: u32,
        offset_x: f64,
        offset_y: f64,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let targets = self.resolve_asset_targets(targets, ctx);
        for id in targets {
            let Some(original) = ctx.store.asset(id).cloned() else {
                continue;
            };
            if original.is_group {
                debug!(%id, "duplicate skips group envelopes");
                report.entries_skipped += 1;
                continue;
            }
            // Each copy is cumulatively offset from the original; the
            // original is left untouched.
            for k in 1..=count {
                let mut copy = original.clone();
                copy.id = EntityId::generate();
                copy.x = original.x + offset_x * k as f64;
                copy.y = original.y + offset_y * k as f64;
                copy.group_id = None;
                copy.created_at = chrono::Utc::now();
                ctx.store.append_asset(copy);
                report.entities_duplicated += 1;
            }
        }
    }

    fn group(&self, members: &[EntityId], ctx: &mut WorkspaceContext, report: &mut ApplyReport) {
        let members = self.resolve_asset_targets(members, ctx);
        if members.len() < 2 {
            warn!(count = members.len(), "group needs at least two resolvable members");
            report.entries_skipped += 1;
            return;
        }

        let Some(bounds) = members
            .iter()
            .filter_map(|id| ctx.store.asset(*id))
            .map(|a| a.bounds())
            .reduce(|acc, b| acc.union(&b))
        else {
            return;
        };

        let center = bounds.center();
        let mut envelope =
            WorkspaceAsset::new("group", center.x, center.y, bounds.width(), bounds.height());
        envelope.is_group = true;
        let gid = ctx.store.append_asset(envelope);
        let assigned = ctx.store.assign_group(&members, gid);
        debug!(group = %gid, members = assigned.len(), "created group");
        report.assets_created += 1;
    }

    fn ungroup(&self, group: EntityId, ctx: &mut WorkspaceContext, report: &mut ApplyReport) {
        let is_group = ctx.store.asset(group).map(|a| a.is_group).unwrap_or(false);
        if !is_group {
            debug!(%group, "ungroup target is not a group envelope; skipping");
            report.entries_skipped += 1;
            return;
        }
        // Member positions stay where they are; only membership clears.
        let cleared = ctx.store.clear_group(group);
        ctx.store.remove_by_id(group);
        ctx.selection.remove(&[group]);
        debug!(%group, members = cleared.len(), "ungrouped");
        report.entities_removed += 1;
    }

    fn select(
        &self,
        select_all: bool,
        criteria: &SelectCriteria,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        if select_all {
            let mut ids: Vec<EntityId> = ctx.store.assets().iter().map(|a| a.id).collect();
            ids.extend(ctx.store.shapes().iter().map(|s| s.id));
            ctx.selection.set(ids);
            return;
        }
        if criteria.is_empty() {
            debug!("select operation carries neither selectAll nor criteria");
            report.entries_skipped += 1;
            return;
        }
        let matches = self.matching_ids(criteria, ctx);
        ctx.selection.set(matches);
    }

    fn deselect(&self, deselect_all: bool, criteria: &SelectCriteria, ctx: &mut WorkspaceContext) {
        if deselect_all || criteria.is_empty() {
            ctx.selection.clear();
            return;
        }
        let matches = self.matching_ids(criteria, ctx);
        ctx.selection.remove(&matches);
    }

    fn matching_ids(&self, criteria: &SelectCriteria, ctx: &WorkspaceContext) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for asset in ctx.store.assets() {
            if asset.is_group {
                continue;
            }
            let size = asset.width.max(asset.height);
            if criteria.matches(Some(&asset.kind), &asset.fill_color, &asset.stroke_color, size) {
                ids.push(asset.id);
            }
        }
        // assetType never matches shapes; the other criteria do.
        if criteria.asset_type.is_none() {
            for shape in ctx.store.shapes() {
                let b = shape.bounds();
                let size = b.width().max(b.height());
                if criteria.matches(None, &shape.fill_color, &shape.stroke_color, size) {
                    ids.push(shape.id);
                }
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceContext;

    fn chair(ctx: &mut WorkspaceContext, x: f64, y: f64) -> EntityId {
        ctx.store
            .append_asset(WorkspaceAsset::new("chair", x, y, 500.0, 500.0))
    }

    fn executor_ctx() -> (PlannerConfig, WorkspaceContext, ApplyReport) {
        (PlannerConfig::default(), WorkspaceContext::new(), ApplyReport::new())
    }

    #[test]
    fn delete_all_empties_the_workspace() {
        let (config, mut ctx, mut report) = executor_ctx();
        chair(&mut ctx, 0.0, 0.0);
        chair(&mut ctx, 100.0, 0.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Delete {
                ids: Vec::new(),
                delete_all: true,
                delete_selected: false,
            }],
            &mut ctx,
            &mut report,
        );
        assert!(ctx.store.is_empty());
        assert_eq!(report.entities_removed, 2);
    }

    #[test]
    fn delete_selected_expands_at_execution_time() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);
        let b = chair(&mut ctx, 100.0, 0.0);
        ctx.selection.set(vec![a]);

        OperationExecutor::new(&config).execute(
            &[Operation::Delete {
                ids: Vec::new(),
                delete_all: false,
                delete_selected: true,
            }],
            &mut ctx,
            &mut report,
        );
        assert!(ctx.store.asset(a).is_none());
        assert!(ctx.store.asset(b).is_some());
        assert!(ctx.selection.is_empty());
    }

    #[test]
    fn align_left_to_canvas() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 3000.0, 1000.0);
        let b = chair(&mut ctx, 7000.0, 2000.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Align {
                edge: AlignEdge::Left,
                relative_to: AlignReference::Canvas,
                targets: vec![a, b],
            }],
            &mut ctx,
            &mut report,
        );
        // Canvas min_x is 0; each 500-wide chair centers at 250.
        assert_eq!(ctx.store.asset(a).unwrap().x, 250.0);
        assert_eq!(ctx.store.asset(b).unwrap().x, 250.0);
        // Y untouched.
        assert_eq!(ctx.store.asset(a).unwrap().y, 1000.0);
    }

    #[test]
    fn align_middle_to_first() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 1000.0, 1000.0);
        let b = chair(&mut ctx, 2000.0, 3000.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Align {
                edge: AlignEdge::Middle,
                relative_to: AlignReference::First,
                targets: vec![a, b],
            }],
            &mut ctx,
            &mut report,
        );
        assert_eq!(ctx.store.asset(b).unwrap().y, 1000.0);
        assert_eq!(ctx.store.asset(b).unwrap().x, 2000.0);
    }

    #[test]
    fn distribute_spans_first_to_last() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);
        let b = chair(&mut ctx, 100.0, 0.0);
        let c = chair(&mut ctx, 3000.0, 0.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Distribute {
                direction: Direction::Horizontal,
                spacing: None,
                targets: vec![a, b, c],
            }],
            &mut ctx,
            &mut report,
        );
        assert_eq!(ctx.store.asset(a).unwrap().x, 0.0);
        assert_eq!(ctx.store.asset(b).unwrap().x, 1500.0);
        assert_eq!(ctx.store.asset(c).unwrap().x, 3000.0);
    }

    #[test]
    fn distribute_with_explicit_spacing() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 100.0, 0.0);
        let b = chair(&mut ctx, 150.0, 0.0);
        let c = chair(&mut ctx, 120.0, 0.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Distribute {
                direction: Direction::Horizontal,
                spacing: Some(250.0),
                targets: vec![a, b, c],
            }],
            &mut ctx,
            &mut report,
        );
        assert_eq!(ctx.store.asset(b).unwrap().x, 350.0);
        assert_eq!(ctx.store.asset(c).unwrap().x, 600.0);
    }

    #[test]
    fn duplicate_offsets_cumulatively() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);

        OperationExecutor::new(&config).execute(
            &[Operation::Duplicate {
                targets: vec![a],
                count: 3,
                offset_x: 100.0,
                offset_y: 0.0,
            }],
            &mut ctx,
            &mut report,
        );
        let xs: Vec<f64> = ctx.store.assets().iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(report.entities_duplicated, 3);
        // Fresh ids throughout.
        let mut ids: Vec<EntityId> = ctx.store.assets().iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn group_then_ungroup_leaves_positions_unchanged() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);
        let b = chair(&mut ctx, 1000.0, 0.0);

        let executor = OperationExecutor::new(&config);
        executor.execute(&[Operation::Group { members: vec![a, b] }], &mut ctx, &mut report);

        let gid = ctx
            .store
            .assets()
            .iter()
            .find(|asset| asset.is_group)
            .map(|asset| asset.id)
            .expect("group envelope created");
        assert_eq!(ctx.store.asset(a).unwrap().group_id, Some(gid));

        executor.execute(&[Operation::Ungroup { group: gid }], &mut ctx, &mut report);
        assert!(ctx.store.asset(gid).is_none());
        let a_after = ctx.store.asset(a).unwrap();
        assert_eq!(a_after.group_id, None);
        assert_eq!((a_after.x, a_after.y), (0.0, 0.0));
    }

    #[test]
    fn select_by_criteria() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);
        let table = ctx
            .store
            .append_asset(WorkspaceAsset::new("rect-table", 0.0, 0.0, 1800.0, 800.0));

        let executor = OperationExecutor::new(&config);
        executor.execute(
            &[Operation::Select {
                select_all: false,
                criteria: SelectCriteria {
                    asset_type: Some("chair".to_string()),
                    ..SelectCriteria::default()
                },
            }],
            &mut ctx,
            &mut report,
        );
        assert_eq!(ctx.selection.current(), &[a]);

        executor.execute(
            &[Operation::Select {
                select_all: false,
                criteria: SelectCriteria {
                    min_size: Some(1000.0),
                    ..SelectCriteria::default()
                },
            }],
            &mut ctx,
            &mut report,
        );
        assert_eq!(ctx.selection.current(), &[table]);
    }

    #[test]
    fn deselect_all_clears_selection() {
        let (config, mut ctx, mut report) = executor_ctx();
        let a = chair(&mut ctx, 0.0, 0.0);
        ctx.selection.set(vec![a]);

        OperationExecutor::new(&config).execute(
            &[Operation::Deselect {
                deselect_all: true,
                criteria: SelectCriteria::default(),
            }],
            &mut ctx,
            &mut report,
        );
        assert!(ctx.selection.is_empty());
    }
}
