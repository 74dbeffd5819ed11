//! # RoomKit
//!
//! Room and event-space planning toolkit. A conversational assistant
//! proposes structured change-plans; this workspace turns them into
//! precise mutations on a 2D spatial workspace.
//!
//! ## Architecture
//!
//! RoomKit is organized as a workspace with multiple crates:
//!
//! 1. **roomkit-core** - Typed ids, geometry primitives, units, errors
//! 2. **roomkit-planner** - Plan interpreter and workspace mutator
//! 3. **roomkit** - Headless CLI that applies plan files to workspaces
//!
//! The chat surface, assistant backend, canvas rendering, and auto-save
//! are external collaborators; this binary only exercises the core.

pub use roomkit_core::{Bounds, EntityId, Point};
pub use roomkit_planner as planner;
pub use roomkit_planner::{
    ApplyReport, Plan, PlanInterpreter, PlannerConfig, WorkspaceContext, WorkspaceStore,
};

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout stays clean for workspace JSON)
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
