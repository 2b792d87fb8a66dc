use std::sync::Arc;

use chrono::NaiveDate;

use crate::cli::{finish, print_json, reference_or_today, report_error};
use crate::config::Config;
use crate::db::SqliteStore;
use crate::error::MatrixError;
use crate::output;
use crate::reconcile::{ReconcileOutcome, Reconciler};

pub fn run(config: &Config, today: Option<NaiveDate>, json_output: bool) -> i32 {
    finish(run_inner(config, today, json_output), json_output)
}

fn run_inner(
    config: &Config,
    today: Option<NaiveDate>,
    json_output: bool,
) -> Result<i32, MatrixError> {
    let store = SqliteStore::open(&config.database)?;
    let reconciler = Reconciler::new(Arc::new(store));

    match reconciler.run(reference_or_today(today)) {
        ReconcileOutcome::Completed(summary) => {
            if json_output {
                print_json(&output::json::success(output::json::reconcile_json(&summary)));
            } else {
                output::text::print_reconcile(&summary);
            }
            Ok(0)
        }
        // Already logged by the reconciler; report it and signal failure.
        ReconcileOutcome::Failed { error, .. } => {
            report_error(&error, json_output);
            Ok(1)
        }
    }
}
