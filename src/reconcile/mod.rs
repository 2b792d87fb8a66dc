//! Periodic urgency reconciliation.
//!
//! [`Reconciler`] brings every open task's derived fields in line with its
//! deadline; [`Scheduler`] decides when that happens and keeps passes from
//! overlapping.

pub mod reconciler;
pub mod scheduler;

pub use reconciler::{plan_changes, ReconcileJob, ReconcileOutcome, ReconcileSummary, Reconciler};
pub use scheduler::{FireOutcome, Scheduler, Trigger};
