//! Error handling for RoomKit
//!
//! Provides error types for the planner layers:
//! - Plan errors (ingestion/normalization)
//! - Store errors (workspace serialization)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Most per-entry problems in plan application are deliberately NOT errors:
//! malformed entries are dropped and stale ids are skipped, per the tolerant
//! interpretation contract. These types cover the cases that genuinely stop
//! a caller from proceeding.

use thiserror::Error;

/// Plan ingestion error type
///
/// Represents problems with the plan envelope itself. Individual malformed
/// entries inside a well-formed envelope never produce these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The plan payload is not a JSON object
    #[error("Plan envelope is not a JSON object (got {found})")]
    NotAnObject {
        /// Short description of what was found instead.
        found: String,
    },

    /// The plan payload could not be parsed as JSON at all
    #[error("Plan payload is not valid JSON: {message}")]
    InvalidJson {
        /// The underlying parse error message.
        message: String,
    },
}

/// Workspace store error type
///
/// Represents failures of store-level invariants, not per-entry lookups
/// (a missing id on update is an `Option`, not an error).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The workspace snapshot could not be serialized or deserialized
    #[error("Workspace serialization failed: {message}")]
    Serialization {
        /// The underlying serde error message.
        message: String,
    },
}
