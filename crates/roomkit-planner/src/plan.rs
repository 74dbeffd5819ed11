//! Plan envelope and normalizer.
//!
//! The assistant backend produces a loosely-shaped JSON object; every field
//! is optional and unchecked. This module turns that untrusted payload into
//! a typed [`Plan`]: missing arrays default to empty, numeric-looking
//! strings coerce to numbers (with unit suffixes honored), documented field
//! defaults are filled in, and malformed individual entries are dropped
//! with a warning - they never fail the rest of the plan.

use roomkit_core::{parse_length_mm, EntityId, PlanError};
use serde_json::{Map, Value};
use tracing::warn;

use crate::layout::GridLayoutParams;
use crate::model::ShapeKind;
use crate::operations::{
    AlignEdge, AlignReference, Direction, Operation, SelectCriteria,
};

/// A furniture item requested by a plan, before materialization.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAsset {
    /// Furniture kind, e.g. `"round-table"`.
    pub kind: String,
    /// Explicit center coordinates (mm). `None` means auto-placed.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Explicit footprint overrides (mm); the catalog supplies defaults.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
}

/// A free-form shape requested by a plan. Field defaults are already
/// applied by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanShape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub rotation: f64,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub z_index: i32,
}

/// A wall segment requested by a plan. Presence of start/end/thickness is
/// validated by the materializer, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanWall {
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub thickness: Option<f64>,
    pub kind: String,
}

/// Which entity family a modification addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModTarget {
    Asset(EntityId),
    Wall(EntityId),
}

impl ModTarget {
    /// The addressed id, whichever family it belongs to.
    pub fn id(&self) -> EntityId {
        match self {
            ModTarget::Asset(id) | ModTarget::Wall(id) => *id,
        }
    }
}

/// A partial property patch targeting one existing entity. Absent fields
/// never overwrite existing values.
#[derive(Debug, Clone, PartialEq)]
pub struct Modification {
    pub target: ModTarget,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub rotation: Option<f64>,
    pub x_mm: Option<f64>,
    pub y_mm: Option<f64>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub scale: Option<f64>,
    /// Explicit opt-in: when the target is a group envelope, apply the
    /// patch to every member instead of the envelope.
    pub apply_to_members: bool,
}

impl Modification {
    /// `true` when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.width_mm.is_none()
            && self.height_mm.is_none()
            && self.rotation.is_none()
            && self.x_mm.is_none()
            && self.y_mm.is_none()
            && self.fill_color.is_none()
            && self.stroke_color.is_none()
            && self.scale.is_none()
    }
}

/// The normalized change-plan consumed by the interpreter pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Current furniture list.
    pub assets: Vec<PlanAsset>,
    /// Deprecated furniture list ("tables"); see the reconciler.
    pub legacy_assets: Vec<PlanAsset>,
    pub shapes: Vec<PlanShape>,
    pub walls: Vec<PlanWall>,
    pub modifications: Vec<Modification>,
    pub operations: Vec<Operation>,
    pub grid_layout: Option<GridLayoutParams>,
}

impl Plan {
    /// Parses and normalizes a plan from raw JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let value: Value = serde_json::from_str(json).map_err(|e| PlanError::InvalidJson {
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Normalizes a plan from an already-parsed JSON value.
    ///
    /// Only a non-object envelope is an error; every malformed section or
    /// entry inside an object envelope degrades to absent/dropped.
    pub fn from_value(value: &Value) -> Result<Self, PlanError> {
        let obj = value.as_object().ok_or_else(|| PlanError::NotAnObject {
            found: json_type_name(value).to_string(),
        })?;

        Ok(Self {
            assets: entries(obj, "assets").filter_map(parse_asset).collect(),
            legacy_assets: entries(obj, "tables").filter_map(parse_asset).collect(),
            shapes: entries(obj, "shapes").filter_map(parse_shape).collect(),
            walls: entries(obj, "walls").filter_map(parse_wall).collect(),
            modifications: entries(obj, "modifications")
                .filter_map(parse_modification)
                .collect(),
            operations: entries(obj, "operations")
                .filter_map(parse_operation)
                .collect(),
            grid_layout: obj.get("gridLayout").and_then(parse_grid_layout),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Iterates the object entries of an array field; a missing or
/// wrongly-typed section behaves as empty.
fn entries<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or(&[])
        .iter()
        .filter_map(move |v| match v.as_object() {
            Some(entry) => Some(entry),
            None => {
                warn!(section = key, "dropping non-object plan entry");
                None
            }
        })
}

/// Coerces a JSON value to a finite number, accepting numeric strings with
/// optional unit suffixes.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_length_mm(s),
        _ => None,
    }
}

/// First present numeric field among `keys`.
fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| obj.get(*k).and_then(as_number))
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Parses a list of id strings from the first present key. Unparseable ids
/// are dropped with a warning - an explicit no-op, not a silent mismatch.
fn id_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<EntityId> {
    let raw = keys
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array));
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|v| v.as_str())
        .filter_map(|s| match s.parse::<EntityId>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(id = s, "dropping unparseable entity id");
                None
            }
        })
        .collect()
}

fn id_field(obj: &Map<String, Value>, key: &str) -> Option<EntityId> {
    let raw = obj.get(key)?.as_str()?;
    match raw.parse::<EntityId>() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(id = raw, field = key, "dropping unparseable entity id");
            None
        }
    }
}

fn parse_asset(entry: &Map<String, Value>) -> Option<PlanAsset> {
    let Some(kind) = text(entry, "type") else {
        warn!("dropping furniture entry without a type");
        return None;
    };
    Some(PlanAsset {
        kind,
        x: number(entry, &["x", "xMm"]),
        y: number(entry, &["y", "yMm"]),
        width: number(entry, &["width", "widthMm"]),
        height: number(entry, &["height", "heightMm"]),
        rotation: number(entry, &["rotation"]),
        fill_color: text(entry, "fillColor"),
        stroke_color: text(entry, "strokeColor"),
    })
}

fn parse_shape_kind(raw: &str) -> Option<ShapeKind> {
    match raw.trim().to_lowercase().as_str() {
        "rect" | "rectangle" => Some(ShapeKind::Rect),
        "circle" => Some(ShapeKind::Circle),
        "line" => Some(ShapeKind::Line),
        _ => None,
    }
}

fn parse_shape(entry: &Map<String, Value>) -> Option<PlanShape> {
    let kind = match text(entry, "type").as_deref().and_then(parse_shape_kind) {
        Some(kind) => kind,
        None => {
            warn!("dropping shape entry with missing or unknown type");
            return None;
        }
    };
    Some(PlanShape {
        kind,
        x: number(entry, &["x", "xMm"]).unwrap_or(0.0),
        y: number(entry, &["y", "yMm"]).unwrap_or(0.0),
        width: number(entry, &["width", "widthMm"]).unwrap_or(0.0),
        height: number(entry, &["height", "heightMm"]).unwrap_or(0.0),
        radius: number(entry, &["radius"]).unwrap_or(crate::model::DEFAULT_RADIUS_MM),
        rotation: number(entry, &["rotation"]).unwrap_or(0.0),
        fill_color: text(entry, "fillColor")
            .unwrap_or_else(|| crate::model::DEFAULT_FILL_COLOR.to_string()),
        stroke_color: text(entry, "strokeColor")
            .unwrap_or_else(|| crate::model::DEFAULT_STROKE_COLOR.to_string()),
        stroke_width: number(entry, &["strokeWidth"]).unwrap_or(crate::model::DEFAULT_STROKE_WIDTH),
        z_index: number(entry, &["zIndex"])
            .map(|z| z as i32)
            .unwrap_or(crate::model::DEFAULT_Z_INDEX),
    })
}

fn parse_wall(entry: &Map<String, Value>) -> Option<PlanWall> {
    let point_field = |key: &str, axis: &str| -> Option<f64> {
        entry
            .get(key)
            .and_then(Value::as_object)
            .and_then(|p| p.get(axis))
            .and_then(as_number)
    };
    Some(PlanWall {
        start_x: point_field("start", "x"),
        start_y: point_field("start", "y"),
        end_x: point_field("end", "x"),
        end_y: point_field("end", "y"),
        thickness: number(entry, &["thickness"]),
        kind: text(entry, "type").unwrap_or_else(|| "interior".to_string()),
    })
}

fn parse_modification(entry: &Map<String, Value>) -> Option<Modification> {
    let target = if let Some(id) = id_field(entry, "assetId") {
        ModTarget::Asset(id)
    } else if let Some(id) = id_field(entry, "wallId") {
        ModTarget::Wall(id)
    } else {
        warn!("dropping modification without a resolvable assetId or wallId");
        return None;
    };
    Some(Modification {
        target,
        width_mm: number(entry, &["widthMm", "width"]),
        height_mm: number(entry, &["heightMm", "height"]),
        rotation: number(entry, &["rotation"]),
        x_mm: number(entry, &["xMm", "x"]),
        y_mm: number(entry, &["yMm", "y"]),
        fill_color: text(entry, "fillColor"),
        stroke_color: text(entry, "strokeColor"),
        scale: number(entry, &["scale"]).filter(|s| *s > 0.0),
        apply_to_members: flag(entry, "applyToMembers"),
    })
}

fn parse_grid_layout(value: &Value) -> Option<GridLayoutParams> {
    let obj = value.as_object()?;
    let columns = number(obj, &["columns"])? as i64;
    let rows = number(obj, &["rows"])? as i64;
    if columns < 1 || rows < 1 {
        warn!(columns, rows, "ignoring grid layout with non-positive dimensions");
        return None;
    }
    Some(GridLayoutParams::new(columns as u32, rows as u32))
}

fn parse_align_edge(raw: &str) -> Option<AlignEdge> {
    match raw.trim().to_lowercase().as_str() {
        "left" => Some(AlignEdge::Left),
        "right" => Some(AlignEdge::Right),
        "center" => Some(AlignEdge::Center),
        "top" => Some(AlignEdge::Top),
        "bottom" => Some(AlignEdge::Bottom),
        "middle" => Some(AlignEdge::Middle),
        _ => None,
    }
}

fn parse_align_reference(raw: &str) -> Option<AlignReference> {
    match raw.trim().to_lowercase().as_str() {
        "canvas" => Some(AlignReference::Canvas),
        "selection" => Some(AlignReference::Selection),
        "first" => Some(AlignReference::First),
        _ => None,
    }
}

fn parse_direction(raw: &str) -> Option<Direction> {
    match raw.trim().to_lowercase().as_str() {
        "horizontal" | "x" => Some(Direction::Horizontal),
        "vertical" | "y" => Some(Direction::Vertical),
        _ => None,
    }
}

/// Maps one loose operation object into the tagged [`Operation`] union.
/// Fields that don't belong to the discriminated kind are ignored, which
/// removes the illegal combinations a flat optional-field bag allows.
fn parse_operation(entry: &Map<String, Value>) -> Option<Operation> {
    let Some(kind) = text(entry, "type") else {
        warn!("dropping operation without a type");
        return None;
    };

    match kind.to_lowercase().as_str() {
        "delete" => Some(Operation::Delete {
            ids: id_list(entry, &["assetIds", "ids"]),
            delete_all: flag(entry, "deleteAll"),
            delete_selected: flag(entry, "deleteSelected"),
        }),
        "align" => {
            let edge = match text(entry, "alignment").as_deref().and_then(parse_align_edge) {
                Some(edge) => edge,
                None => {
                    warn!("dropping align operation with missing or unknown alignment");
                    return None;
                }
            };
            let relative_to = text(entry, "relativeTo")
                .as_deref()
                .and_then(parse_align_reference)
                .unwrap_or(AlignReference::Selection);
            Some(Operation::Align {
                edge,
                relative_to,
                targets: id_list(entry, &["assetIds", "ids"]),
            })
        }
        "distribute" => {
            let direction = match text(entry, "direction").as_deref().and_then(parse_direction) {
                Some(direction) => direction,
                None => {
                    warn!("dropping distribute operation with missing or unknown direction");
                    return None;
                }
            };
            Some(Operation::Distribute {
                direction,
                spacing: number(entry, &["spacing", "spacingMm"]),
                targets: id_list(entry, &["assetIds", "ids"]),
            })
        }
        // An explicit count of 0 is honored as "no copies"; only an
        // absent count defaults to 1.
        "duplicate" => Some(Operation::Duplicate {
            targets: id_list(entry, &["assetIds", "ids"]),
            count: number(entry, &["count"])
                .map(|c| (c as i64).max(0) as u32)
                .unwrap_or(1),
            offset_x: number(entry, &["offsetX", "offsetXMm"]).unwrap_or(100.0),
            offset_y: number(entry, &["offsetY", "offsetYMm"]).unwrap_or(100.0),
        }),
        // An empty member list groups the current selection at execution
        // time.
        "group" => Some(Operation::Group {
            members: id_list(entry, &["assetIds", "ids"]),
        }),
        "ungroup" => match id_field(entry, "groupId") {
            Some(group) => Some(Operation::Ungroup { group }),
            None => {
                warn!("dropping ungroup operation without a resolvable groupId");
                None
            }
        },
        "select" => Some(Operation::Select {
            select_all: flag(entry, "selectAll"),
            criteria: parse_criteria(entry),
        }),
        "deselect" => Some(Operation::Deselect {
            deselect_all: flag(entry, "deselectAll"),
            criteria: parse_criteria(entry),
        }),
        other => {
            warn!(kind = other, "dropping operation of unknown type");
            None
        }
    }
}

fn parse_criteria(entry: &Map<String, Value>) -> SelectCriteria {
    SelectCriteria {
        asset_type: text(entry, "assetType"),
        color: text(entry, "color"),
        min_size: number(entry, &["minSize", "minSizeMm"]),
        max_size: number(entry, &["maxSize", "maxSizeMm"]),
    }
}
