//! Plan interpreter pipeline.
//!
//! Single-pass state machine over a normalized plan, in fixed order:
//! reconciliation, wall creation, furniture creation (current or legacy
//! list per the reconciler), shape creation, modifications, operations.
//! The order matters because later stages may target entities created in
//! earlier stages of the same plan. The pipeline runs synchronously to
//! completion; there is no mid-plan cancellation, and partially applied
//! state between stages is an acceptable intermediate.

use serde_json::Value;
use tracing::info;

use roomkit_core::PlanError;

use crate::config::PlannerConfig;
use crate::materialize::EntityMaterializer;
use crate::modify::ModificationApplier;
use crate::operations::OperationExecutor;
use crate::plan::Plan;
use crate::reconcile::reconcile_furniture;
use crate::report::ApplyReport;
use crate::workspace::WorkspaceContext;

/// Applies change-plans to a workspace context.
///
/// The context is taken by `&mut` for the whole application, which is the
/// serialization the shared store requires: two plans can never interleave
/// on one workspace.
#[derive(Debug, Clone, Default)]
pub struct PlanInterpreter {
    config: PlannerConfig,
}

impl PlanInterpreter {
    /// Creates an interpreter with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Parses, normalizes, and applies a plan from raw JSON text.
    pub fn apply_json(
        &self,
        json: &str,
        ctx: &mut WorkspaceContext,
    ) -> Result<ApplyReport, PlanError> {
        let plan = Plan::from_json_str(json)?;
        Ok(self.apply(&plan, ctx))
    }

    /// Normalizes and applies a plan from a parsed JSON value.
    pub fn apply_value(
        &self,
        value: &Value,
        ctx: &mut WorkspaceContext,
    ) -> Result<ApplyReport, PlanError> {
        let plan = Plan::from_value(value)?;
        Ok(self.apply(&plan, ctx))
    }

    /// Applies a normalized plan, returning the accumulated report.
    pub fn apply(&self, plan: &Plan, ctx: &mut WorkspaceContext) -> ApplyReport {
        let mut report = ApplyReport::new();
        let materializer = EntityMaterializer::new(&self.config);

        let (furniture, _source) = reconcile_furniture(plan, &mut report);

        materializer.materialize_walls(&plan.walls, ctx, &mut report);
        materializer.materialize_furniture(furniture, plan.grid_layout, ctx, &mut report);
        materializer.materialize_shapes(&plan.shapes, ctx, &mut report);

        ModificationApplier::apply(&plan.modifications, ctx, &mut report);
        OperationExecutor::new(&self.config).execute(&plan.operations, ctx, &mut report);

        info!(summary = %report.summary(), "plan applied");
        report
    }
}
