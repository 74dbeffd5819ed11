//! # RoomKit Planner
//!
//! Plan interpreter and workspace mutator for RoomKit. A conversational
//! assistant proposes loosely-shaped change-plans (add furniture, shapes,
//! walls; modify selected items; run bulk operations); this crate turns
//! them deterministically into entity creations, property patches, and
//! bulk geometric operations against a shared 2D workspace.
//!
//! ## Pipeline
//!
//! ```text
//! Plan JSON (untrusted)
//!   └── plan::Plan            (normalize: defaults, coercion, drops)
//!         └── reconcile       (deprecated vs current furniture list)
//!               └── materialize   (walls, then furniture, then shapes)
//!                     └── modify      (partial property patches)
//!                           └── operations  (delete/align/distribute/...)
//! ```
//!
//! Every stage mutates one explicit [`workspace::WorkspaceContext`]; the
//! fixed order exists because later stages may target entities created in
//! earlier stages of the same plan. Geometry helpers in [`layout`] are
//! pure. Applying the same plan twice duplicates entities by design.

pub mod catalog;
pub mod config;
pub mod interpreter;
pub mod layout;
pub mod materialize;
pub mod model;
pub mod modify;
pub mod operations;
pub mod plan;
pub mod reconcile;
pub mod report;
pub mod workspace;

pub use config::PlannerConfig;
pub use interpreter::PlanInterpreter;
pub use layout::{clamp_to_bounds, grid_positions, GridLayoutParams, DEFAULT_CLAMP_MARGIN_MM};
pub use model::{ShapeKind, Wall, WorkspaceAsset, WorkspaceShape};
pub use plan::{ModTarget, Modification, Plan, PlanAsset, PlanShape, PlanWall};
pub use report::ApplyReport;
pub use workspace::{Selection, WorkspaceContext, WorkspaceStore};

pub use operations::{
    AlignEdge, AlignReference, Direction, Operation, OperationExecutor, SelectCriteria,
};
