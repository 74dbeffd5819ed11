//! Modification application.
//!
//! Each modification entry becomes a partial patch: only explicitly
//! present fields land on the entity, absent fields never overwrite. The
//! `scale` field recomputes width/height from the asset's base footprint
//! instead of compounding with the previously stored scale, so repeated
//! scale modifications don't drift. Unknown ids are per-entry no-ops - a
//! later plan section may reference an id invalidated earlier in the same
//! pass - and never abort the remaining entries.

use tracing::debug;

use crate::model::WorkspaceAsset;
use crate::plan::{ModTarget, Modification};
use crate::report::ApplyReport;
use crate::workspace::WorkspaceContext;

/// Applies partial property patches to existing entities.
pub struct ModificationApplier;

impl ModificationApplier {
    /// Applies every modification in order. Group-aware addressing: a
    /// group id patches the envelope unless `applyToMembers` opts into
    /// fanning the same patch out to each member.
    pub fn apply(
        modifications: &[Modification],
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        for m in modifications {
            if m.is_empty() {
                debug!(target = %m.target.id(), "skipping modification with no fields");
                report.entries_skipped += 1;
                continue;
            }
            match m.target {
                ModTarget::Asset(id) => Self::apply_to_asset(id, m, ctx, report),
                ModTarget::Wall(id) => Self::apply_to_wall(id, m, ctx, report),
            }
        }
    }

    fn apply_to_asset(
        id: roomkit_core::EntityId,
        m: &Modification,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        let is_group = match ctx.store.asset(id) {
            Some(asset) => asset.is_group,
            None => {
                // Fall back to shapes: producers address them through the
                // same id field.
                if Self::apply_to_shape(id, m, ctx, report) {
                    return;
                }
                debug!(%id, "modification target not found; skipping");
                report.entries_skipped += 1;
                return;
            }
        };

        if is_group && m.apply_to_members {
            let members = ctx.store.group_members(id);
            if members.is_empty() {
                debug!(%id, "group fan-out requested but group has no members");
                report.entries_skipped += 1;
                return;
            }
            for member in members {
                if ctx
                    .store
                    .update_asset(member, |asset| Self::patch_asset(asset, m))
                    .is_some()
                {
                    report.entities_patched += 1;
                }
            }
            return;
        }

        // Addressing is purely by which id was supplied: a group id
        // patches the envelope, a member id patches that member.
        if ctx
            .store
            .update_asset(id, |asset| Self::patch_asset(asset, m))
            .is_some()
        {
            report.entities_patched += 1;
        }
    }

    fn patch_asset(asset: &mut WorkspaceAsset, m: &Modification) {
        // Explicit dimensions re-anchor the base footprint; a later scale
        // multiplies from these, not from the scaled values.
        if let Some(width) = m.width_mm {
            asset.width = width;
            asset.base_width = width;
        }
        if let Some(height) = m.height_mm {
            asset.height = height;
            asset.base_height = height;
        }
        if let Some(scale) = m.scale {
            asset.scale = scale;
            asset.width = asset.base_width * scale;
            asset.height = asset.base_height * scale;
        }
        if let Some(rotation) = m.rotation {
            asset.set_rotation(rotation);
        }
        if let Some(x) = m.x_mm {
            asset.x = x;
        }
        if let Some(y) = m.y_mm {
            asset.y = y;
        }
        if let Some(fill) = &m.fill_color {
            asset.fill_color = fill.clone();
        }
        if let Some(stroke) = &m.stroke_color {
            asset.stroke_color = stroke.clone();
        }
    }

    /// Tries the shape table. Returns `true` when a shape was patched.
    fn apply_to_shape(
        id: roomkit_core::EntityId,
        m: &Modification,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) -> bool {
        if m.scale.is_some() {
            debug!(%id, "scale is not applicable to shapes; field ignored");
        }
        let patched = ctx.store.update_shape(id, |shape| {
            if let Some(width) = m.width_mm {
                shape.width = width;
            }
            if let Some(height) = m.height_mm {
                shape.height = height;
            }
            if let Some(rotation) = m.rotation {
                shape.rotation = roomkit_core::normalize_rotation(rotation);
            }
            if let Some(x) = m.x_mm {
                shape.x = x;
            }
            if let Some(y) = m.y_mm {
                shape.y = y;
            }
            if let Some(fill) = &m.fill_color {
                shape.fill_color = fill.clone();
            }
            if let Some(stroke) = &m.stroke_color {
                shape.stroke_color = stroke.clone();
            }
        });
        if patched.is_some() {
            report.entities_patched += 1;
            true
        } else {
            false
        }
    }

    /// Walls only support repositioning: `xMm`/`yMm` name the new midpoint
    /// and both endpoints translate rigidly. Other fields are skipped.
    fn apply_to_wall(
        id: roomkit_core::EntityId,
        m: &Modification,
        ctx: &mut WorkspaceContext,
        report: &mut ApplyReport,
    ) {
        if m.x_mm.is_none() && m.y_mm.is_none() {
            debug!(%id, "wall modification carries no position fields; skipping");
            report.entries_skipped += 1;
            return;
        }
        let patched = ctx.store.update_wall(id, |wall| {
            let mid = wall.midpoint();
            let dx = m.x_mm.map(|x| x - mid.x).unwrap_or(0.0);
            let dy = m.y_mm.map(|y| y - mid.y).unwrap_or(0.0);
            wall.translate(dx, dy);
        });
        match patched {
            Some(_) => report.entities_patched += 1,
            None => {
                debug!(%id, "wall modification target not found; skipping");
                report.entries_skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomkit_core::{EntityId, Point};
    use crate::model::Wall;

    fn patch(target: ModTarget) -> Modification {
        Modification {
            target,
            width_mm: None,
            height_mm: None,
            rotation: None,
            x_mm: None,
            y_mm: None,
            fill_color: None,
            stroke_color: None,
            scale: None,
            apply_to_members: false,
        }
    }

    #[test]
    fn absent_fields_do_not_overwrite() {
        let mut ctx = WorkspaceContext::new();
        let id = ctx
            .store
            .append_asset(WorkspaceAsset::new("rect-table", 0.0, 0.0, 500.0, 500.0));

        let mut m = patch(ModTarget::Asset(id));
        m.rotation = Some(90.0);
        let mut report = ApplyReport::new();
        ModificationApplier::apply(&[m], &mut ctx, &mut report);

        let asset = ctx.store.asset(id).unwrap();
        assert_eq!(asset.width, 500.0);
        assert_eq!(asset.height, 500.0);
        assert_eq!(asset.rotation, 90.0);
        assert_eq!(report.entities_patched, 1);
    }

    #[test]
    fn scale_recomputes_from_base_without_drift() {
        let mut ctx = WorkspaceContext::new();
        let id = ctx
            .store
            .append_asset(WorkspaceAsset::new("rect-table", 0.0, 0.0, 100.0, 50.0));

        let mut m = patch(ModTarget::Asset(id));
        m.scale = Some(2.0);
        let mut report = ApplyReport::new();
        ModificationApplier::apply(&[m.clone(), m], &mut ctx, &mut report);

        // Applied twice: still base * 2, not base * 4.
        let asset = ctx.store.asset(id).unwrap();
        assert_eq!(asset.width, 200.0);
        assert_eq!(asset.height, 100.0);
        assert_eq!(asset.scale, 2.0);
    }

    #[test]
    fn unknown_id_is_a_silent_no_op() {
        let mut ctx = WorkspaceContext::new();
        let survivor = ctx
            .store
            .append_asset(WorkspaceAsset::new("chair", 0.0, 0.0, 500.0, 500.0));

        let mut miss = patch(ModTarget::Asset(EntityId::generate()));
        miss.rotation = Some(45.0);
        let mut hit = patch(ModTarget::Asset(survivor));
        hit.rotation = Some(45.0);

        let mut report = ApplyReport::new();
        ModificationApplier::apply(&[miss, hit], &mut ctx, &mut report);

        // The miss never aborts the remaining entries.
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(ctx.store.asset(survivor).unwrap().rotation, 45.0);
    }

    #[test]
    fn group_id_addresses_envelope_unless_fanned_out() {
        let mut ctx = WorkspaceContext::new();
        let a = ctx
            .store
            .append_asset(WorkspaceAsset::new("chair", 0.0, 0.0, 500.0, 500.0));
        let b = ctx
            .store
            .append_asset(WorkspaceAsset::new("chair", 600.0, 0.0, 500.0, 500.0));
        let mut envelope = WorkspaceAsset::new("group", 300.0, 0.0, 1100.0, 500.0);
        envelope.is_group = true;
        let gid = ctx.store.append_asset(envelope);
        ctx.store.assign_group(&[a, b], gid);

        let mut m = patch(ModTarget::Asset(gid));
        m.fill_color = Some("#ff0000".to_string());
        let mut report = ApplyReport::new();
        ModificationApplier::apply(&[m.clone()], &mut ctx, &mut report);
        assert_eq!(ctx.store.asset(gid).unwrap().fill_color, "#ff0000");
        assert_ne!(ctx.store.asset(a).unwrap().fill_color, "#ff0000");

        m.apply_to_members = true;
        ModificationApplier::apply(&[m], &mut ctx, &mut report);
        assert_eq!(ctx.store.asset(a).unwrap().fill_color, "#ff0000");
        assert_eq!(ctx.store.asset(b).unwrap().fill_color, "#ff0000");
    }

    #[test]
    fn wall_reposition_translates_endpoints() {
        let mut ctx = WorkspaceContext::new();
        let id = ctx.store.append_wall(Wall::new(
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            100.0,
            "interior",
        ));

        let mut m = patch(ModTarget::Wall(id));
        m.x_mm = Some(1500.0);
        m.y_mm = Some(500.0);
        let mut report = ApplyReport::new();
        ModificationApplier::apply(&[m], &mut ctx, &mut report);

        let wall = ctx.store.wall(id).unwrap();
        assert_eq!(wall.start, Point::new(1000.0, 500.0));
        assert_eq!(wall.end, Point::new(2000.0, 500.0));
    }
}
