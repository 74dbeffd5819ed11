//! Workspace entity model.
//!
//! Three entity families live on the workspace: assets (furniture and
//! fixtures), free-form shapes, and walls. All coordinates are
//! workspace-space millimeters; asset and rect/circle shape positions are
//! the entity's center point. Rotation is stored normalized into `[0, 360)`.

use chrono::{DateTime, Utc};
use roomkit_core::{normalize_rotation, Bounds, EntityId, Point};
use serde::{Deserialize, Serialize};

/// Default fill color applied when a plan entry carries none.
pub const DEFAULT_FILL_COLOR: &str = "#cccccc";
/// Default stroke color applied when a plan entry carries none.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
/// Default circle radius in millimeters.
pub const DEFAULT_RADIUS_MM: f64 = 50.0;
/// Default stroke width for shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
/// Default z-index for shapes.
pub const DEFAULT_Z_INDEX: i32 = 1;

/// A furniture or fixture entity placed on the workspace.
///
/// `x`/`y` is the center of the footprint. `base_width`/`base_height`
/// record the unscaled footprint so that a later `scale` modification can
/// recompute dimensions from the multiplier instead of compounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAsset {
    pub id: EntityId,
    /// Asset kind, e.g. `"round-table"` or `"chair"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub base_width: f64,
    pub base_height: f64,
    /// Rotation in degrees, normalized into `[0, 360)`.
    pub rotation: f64,
    /// Dimension multiplier, always > 0.
    pub scale: f64,
    pub fill_color: String,
    pub stroke_color: String,
    /// Group envelope this asset belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<EntityId>,
    /// `true` when this entity is itself a group envelope.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_group: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceAsset {
    /// Creates an asset with a fresh id and default appearance.
    pub fn new(kind: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: EntityId::generate(),
            kind: kind.into(),
            x,
            y,
            width,
            height,
            base_width: width,
            base_height: height,
            rotation: 0.0,
            scale: 1.0,
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            group_id: None,
            is_group: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the rotation, normalizing into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_rotation(degrees);
    }

    /// Center point of the asset.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Axis-aligned footprint of the asset, ignoring rotation.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
        )
    }
}

/// Kinds of free-form shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
}

/// A free-form annotation shape on the workspace.
///
/// For `Rect` and `Circle`, `x`/`y` is the center. For `Line`, `x`/`y` is
/// the start point and `width`/`height` is the delta to the end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceShape {
    pub id: EntityId,
    #[serde(rename = "type")]
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
    pub created_at: DateTime<Utc>,
}

impl WorkspaceShape {
    /// Creates a shape with a fresh id and default appearance.
    pub fn new(kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            id: EntityId::generate(),
            kind,
            x,
            y,
            width: 0.0,
            height: 0.0,
            radius: DEFAULT_RADIUS_MM,
            rotation: 0.0,
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            z_index: DEFAULT_Z_INDEX,
            created_at: Utc::now(),
        }
    }

    /// Axis-aligned extent of the shape.
    pub fn bounds(&self) -> Bounds {
        match self.kind {
            ShapeKind::Rect => Bounds::new(
                self.x - self.width / 2.0,
                self.y - self.height / 2.0,
                self.x + self.width / 2.0,
                self.y + self.height / 2.0,
            ),
            ShapeKind::Circle => Bounds::new(
                self.x - self.radius,
                self.y - self.radius,
                self.x + self.radius,
                self.y + self.radius,
            ),
            ShapeKind::Line => Bounds::from_segment(
                Point::new(self.x, self.y),
                Point::new(self.x + self.width, self.y + self.height),
            ),
        }
    }
}

/// A wall segment bounding the usable region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: EntityId,
    pub start: Point,
    pub end: Point,
    pub thickness: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl Wall {
    /// Creates a wall with a fresh id.
    pub fn new(start: Point, end: Point, thickness: f64, kind: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            start,
            end,
            thickness,
            kind: kind.into(),
            created_at: Utc::now(),
        }
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Translates both endpoints rigidly.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.start.x += dx;
        self.start.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    /// Axis-aligned extent of the wall centerline.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_segment(self.start, self.end)
    }
}
