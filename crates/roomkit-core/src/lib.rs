//! # RoomKit Core
//!
//! Core types and utilities for RoomKit.
//! Provides the fundamental abstractions shared by the planner crates:
//! typed entity ids, geometry primitives, unit parsing, and error types.

pub mod error;
pub mod geometry;
pub mod id;
pub mod units;

pub use error::{PlanError, StoreError};
pub use geometry::{normalize_rotation, Bounds, Point};
pub use id::EntityId;
pub use units::parse_length_mm;
