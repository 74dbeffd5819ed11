//! Legacy furniture list reconciliation.
//!
//! Upstream producers may populate both the deprecated `tables` list and
//! the current `assets` list, sometimes redundantly. The precedence is
//! total and applied before any materialization: a non-empty current list
//! wins outright; the deprecated list is processed only when the current
//! list is empty. Both lists are never processed in the same application.

use tracing::{debug, warn};

use crate::plan::{Plan, PlanAsset};
use crate::report::ApplyReport;

/// Which list furniture creation will read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnitureSource {
    Current,
    Legacy,
}

/// Resolves the deprecated-vs-current ambiguity for one plan.
///
/// Returns the winning list and its provenance. When both lists are
/// populated - an upstream contract violation - the current list wins
/// deterministically and a diagnostic is surfaced to the operator.
pub fn reconcile_furniture<'a>(
    plan: &'a Plan,
    report: &mut ApplyReport,
) -> (&'a [PlanAsset], FurnitureSource) {
    if !plan.assets.is_empty() {
        if !plan.legacy_assets.is_empty() {
            warn!(
                current = plan.assets.len(),
                legacy = plan.legacy_assets.len(),
                "plan carries both current and deprecated furniture lists; using current"
            );
            report.diagnostic(format!(
                "upstream contract violation: both furniture lists populated \
                 ({} current, {} deprecated); deprecated list ignored",
                plan.assets.len(),
                plan.legacy_assets.len()
            ));
        }
        return (&plan.assets, FurnitureSource::Current);
    }

    if !plan.legacy_assets.is_empty() {
        debug!(
            count = plan.legacy_assets.len(),
            "current furniture list empty; falling back to deprecated list"
        );
    }
    (&plan.legacy_assets, FurnitureSource::Legacy)
}
