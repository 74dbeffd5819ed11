//! Integration tests for the plan interpreter pipeline.

use roomkit_planner::{PlanInterpreter, WorkspaceContext};
use serde_json::json;

fn hall_walls() -> serde_json::Value {
    json!([
        {"start": {"x": 0, "y": 0}, "end": {"x": 10000, "y": 0}, "thickness": 100},
        {"start": {"x": 10000, "y": 0}, "end": {"x": 10000, "y": 8000}, "thickness": 100},
        {"start": {"x": 10000, "y": 8000}, "end": {"x": 0, "y": 8000}, "thickness": 100},
        {"start": {"x": 0, "y": 8000}, "end": {"x": 0, "y": 0}, "thickness": 100}
    ])
}

#[test]
fn grid_layout_end_to_end() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    let items: Vec<serde_json::Value> = (0..12)
        .map(|_| json!({"type": "chair", "width": 700, "height": 700}))
        .collect();
    let report = interpreter
        .apply_value(
            &json!({
                "walls": hall_walls(),
                "assets": items,
                "gridLayout": {"columns": 3, "rows": 4}
            }),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.walls_created, 4);
    assert_eq!(report.assets_created, 12);

    // gapX = (10000 - 2100) / 4 = 1975, gapY = (8000 - 2800) / 5 = 1040.
    let assets = ctx.store.assets();
    assert_eq!((assets[0].x, assets[0].y), (2325.0, 1390.0));
    // Item 3 is row 1, col 0 (row-major).
    assert_eq!((assets[3].x, assets[3].y), (2325.0, 3130.0));

    // All centers inside the wall bounds.
    let bounds = ctx.store.wall_bounds().unwrap();
    for asset in assets {
        assert!(bounds.contains(&asset.center()), "asset at ({}, {})", asset.x, asset.y);
    }
}

#[test]
fn grid_placed_assets_are_exempt_from_clamping() {
    // A 1x1 grid in a tight room: the grid center is closer to the wall
    // than the clamp margin would allow for an item this large, and the
    // grid position must win anyway.
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({
                "walls": [
                    {"start": {"x": 0, "y": 0}, "end": {"x": 800, "y": 600}, "thickness": 50}
                ],
                "assets": [{"type": "chair", "width": 750, "height": 550}],
                "gridLayout": {"columns": 1, "rows": 1}
            }),
            &mut ctx,
        )
        .unwrap();

    // Grid center of the single cell, exactly; clamping would have moved it.
    let chair = &ctx.store.assets()[0];
    assert_eq!((chair.x, chair.y), (400.0, 300.0));
}

#[test]
fn user_specified_coordinates_are_clamped() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({
                "walls": hall_walls(),
                "assets": [
                    {"type": "chair", "x": 20, "y": 20, "width": 700, "height": 700}
                ]
            }),
            &mut ctx,
        )
        .unwrap();

    // Interior is [50, 9950]; a 700-wide item centers no closer than 400.
    let chair = &ctx.store.assets()[0];
    assert_eq!((chair.x, chair.y), (400.0, 400.0));
}

#[test]
fn current_list_wins_over_deprecated() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    let report = interpreter
        .apply_value(
            &json!({
                "assets": [{"type": "chair"}, {"type": "chair"}],
                "tables": [{"type": "round-table"}, {"type": "round-table"}, {"type": "round-table"}]
            }),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.assets_created, 2);
    assert!(ctx.store.assets().iter().all(|a| a.kind == "chair"));
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn deprecated_list_used_when_current_absent() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    let report = interpreter
        .apply_value(
            &json!({"tables": [{"type": "round-table"}]}),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.assets_created, 1);
    assert_eq!(ctx.store.assets()[0].kind, "round-table");
    assert!(report.diagnostics.is_empty());
}

#[test]
fn partial_patch_preserves_unnamed_fields() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({"assets": [{"type": "rect-table", "x": 1000, "y": 1000,
                                "width": 500, "height": 500}]}),
            &mut ctx,
        )
        .unwrap();
    let id = ctx.store.assets()[0].id;

    interpreter
        .apply_value(
            &json!({"modifications": [{"assetId": id.to_string(), "rotation": 90}]}),
            &mut ctx,
        )
        .unwrap();

    let table = ctx.store.asset(id).unwrap();
    assert_eq!(table.width, 500.0);
    assert_eq!(table.height, 500.0);
    assert_eq!(table.rotation, 90.0);
}

#[test]
fn scale_patch_recomputes_dimensions() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({"assets": [{"type": "rect-table", "x": 0, "y": 0,
                                "width": 100, "height": 50}]}),
            &mut ctx,
        )
        .unwrap();
    let id = ctx.store.assets()[0].id;

    interpreter
        .apply_value(
            &json!({"modifications": [{"assetId": id.to_string(), "scale": 2}]}),
            &mut ctx,
        )
        .unwrap();

    let table = ctx.store.asset(id).unwrap();
    assert_eq!(table.width, 200.0);
    assert_eq!(table.height, 100.0);
}

#[test]
fn delete_all_leaves_nothing() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({
                "walls": hall_walls(),
                "assets": [{"type": "chair"}],
                "shapes": [{"type": "circle", "x": 500, "y": 500}]
            }),
            &mut ctx,
        )
        .unwrap();
    assert!(!ctx.store.is_empty());

    interpreter
        .apply_value(
            &json!({"operations": [{"type": "delete", "deleteAll": true}]}),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(ctx.store.assets().len(), 0);
    assert_eq!(ctx.store.shapes().len(), 0);
    assert_eq!(ctx.store.walls().len(), 0);
}

#[test]
fn duplicate_offsets_copies_and_keeps_original() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({"assets": [{"type": "chair", "x": 0, "y": 0}]}),
            &mut ctx,
        )
        .unwrap();
    let id = ctx.store.assets()[0].id;

    let report = interpreter
        .apply_value(
            &json!({"operations": [{
                "type": "duplicate",
                "assetIds": [id.to_string()],
                "count": 3, "offsetX": 100, "offsetY": 0
            }]}),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.entities_duplicated, 3);
    let xs: Vec<f64> = ctx.store.assets().iter().map(|a| a.x).collect();
    assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0]);
    assert_eq!(ctx.store.asset(id).unwrap().x, 0.0);
}

#[test]
fn reapplying_a_plan_duplicates_entities() {
    // Non-idempotency is by design, not a defect.
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();
    let plan = json!({"assets": [{"type": "chair", "x": 100, "y": 100}]});

    interpreter.apply_value(&plan, &mut ctx).unwrap();
    interpreter.apply_value(&plan, &mut ctx).unwrap();

    assert_eq!(ctx.store.assets().len(), 2);
    assert_ne!(ctx.store.assets()[0].id, ctx.store.assets()[1].id);
}

#[test]
fn select_then_group_then_fan_out_modification() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    interpreter
        .apply_value(
            &json!({"assets": [
                {"type": "chair", "x": 100, "y": 100},
                {"type": "chair", "x": 800, "y": 100}
            ]}),
            &mut ctx,
        )
        .unwrap();

    interpreter
        .apply_value(
            &json!({"operations": [
                {"type": "select", "assetType": "chair"},
                {"type": "group"}
            ]}),
            &mut ctx,
        )
        .unwrap();

    let gid = ctx
        .store
        .assets()
        .iter()
        .find(|a| a.is_group)
        .map(|a| a.id)
        .expect("group envelope created");

    interpreter
        .apply_value(
            &json!({"modifications": [{
                "assetId": gid.to_string(),
                "fillColor": "#112233",
                "applyToMembers": true
            }]}),
            &mut ctx,
        )
        .unwrap();

    for asset in ctx.store.assets().iter().filter(|a| !a.is_group) {
        assert_eq!(asset.fill_color, "#112233");
    }
    // The envelope itself keeps its default fill.
    assert_ne!(ctx.store.asset(gid).unwrap().fill_color, "#112233");
}

#[test]
fn malformed_sections_never_fail_the_pass() {
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    let report = interpreter
        .apply_value(
            &json!({
                "assets": [{"type": "chair"}, {"width": 100}],
                "walls": "not-an-array",
                "modifications": [{"assetId": "garbage", "rotation": 90}],
                "operations": [{"type": "hover"}]
            }),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.assets_created, 1);
    assert_eq!(ctx.store.walls().len(), 0);
}

#[test]
fn operations_target_entities_created_this_pass() {
    // Section order: creations land before operations run.
    let interpreter = PlanInterpreter::default();
    let mut ctx = WorkspaceContext::new();

    let report = interpreter
        .apply_value(
            &json!({
                "assets": [
                    {"type": "chair", "x": 100, "y": 500},
                    {"type": "chair", "x": 900, "y": 700}
                ],
                "operations": [
                    {"type": "select", "assetType": "chair"},
                    {"type": "align", "alignment": "middle", "relativeTo": "first"}
                ]
            }),
            &mut ctx,
        )
        .unwrap();

    assert_eq!(report.assets_created, 2);
    let ys: Vec<f64> = ctx.store.assets().iter().map(|a| a.y).collect();
    assert_eq!(ys, vec![500.0, 500.0]);
}
