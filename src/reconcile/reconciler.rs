use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::classify::classify;
use crate::db::TaskStore;
use crate::error::MatrixError;
use crate::models::{Task, UrgencyChange};

/// Result of one successful pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub reference: NaiveDate,
    /// Incomplete tasks read from the store.
    pub scanned: usize,
    /// Rows whose derived fields were rewritten.
    pub updated: usize,
    /// Planned changes dropped because the row changed after the scan.
    pub stale: usize,
}

#[derive(Debug)]
pub enum ReconcileOutcome {
    Completed(ReconcileSummary),
    /// Nothing from this pass was persisted.
    Failed {
        reference: NaiveDate,
        scanned: usize,
        error: MatrixError,
    },
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn summary(&self) -> Option<&ReconcileSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::Failed { .. } => None,
        }
    }
}

/// A reconciliation pass the scheduler can drive.
///
/// Implementations never panic or return errors to the caller; failures are
/// reported through [`ReconcileOutcome::Failed`].
pub trait ReconcileJob: Send + Sync + 'static {
    fn run(&self, reference: NaiveDate) -> ReconcileOutcome;
}

/// Changes needed to bring `tasks` in line with `reference`.
///
/// Completed tasks and tasks whose derived fields already match are skipped.
pub fn plan_changes(tasks: &[Task], reference: NaiveDate) -> Vec<UrgencyChange> {
    tasks
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|t| {
            let fresh = classify(t.is_important, t.deadline_at, reference);
            if fresh.is_urgent == t.is_urgent && fresh.quadrant == t.quadrant {
                return None;
            }
            Some(UrgencyChange {
                id: t.id,
                is_urgent: fresh.is_urgent,
                quadrant: fresh.quadrant,
                expected_important: t.is_important,
                expected_deadline: t.deadline_at,
                expected_urgent: t.is_urgent,
                expected_quadrant: t.quadrant,
            })
        })
        .collect()
}

pub struct Reconciler {
    store: Arc<dyn TaskStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Scan incomplete tasks, recompute urgency, commit changed rows as one batch.
    pub fn run(&self, reference: NaiveDate) -> ReconcileOutcome {
        let tasks = match self.store.list_incomplete() {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(%reference, code = e.code.as_str(), "urgency reconciliation failed to scan tasks: {e}");
                return ReconcileOutcome::Failed {
                    reference,
                    scanned: 0,
                    error: e,
                };
            }
        };
        let scanned = tasks.len();
        let changes = plan_changes(&tasks, reference);

        if changes.is_empty() {
            info!(%reference, scanned, "no urgency changes required");
            return ReconcileOutcome::Completed(ReconcileSummary {
                reference,
                scanned,
                updated: 0,
                stale: 0,
            });
        }

        match self.store.commit_batch(&changes) {
            Ok(updated) => {
                let stale = changes.len() - updated;
                if stale > 0 {
                    warn!(%reference, stale, "tasks changed during reconciliation were left to their editors");
                }
                info!(%reference, scanned, updated, "urgency reconciliation committed");
                ReconcileOutcome::Completed(ReconcileSummary {
                    reference,
                    scanned,
                    updated,
                    stale,
                })
            }
            Err(e) => {
                error!(
                    %reference,
                    scanned,
                    planned = changes.len(),
                    code = e.code.as_str(),
                    "urgency reconciliation rolled back: {e}"
                );
                ReconcileOutcome::Failed {
                    reference,
                    scanned,
                    error: e,
                }
            }
        }
    }
}

impl ReconcileJob for Reconciler {
    fn run(&self, reference: NaiveDate) -> ReconcileOutcome {
        Reconciler::run(self, reference)
    }
}
