pub mod commands;
pub mod init;
pub mod reconcile;
pub mod serve;
pub mod stats;
pub mod task;

pub use commands::*;

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::config::Config;
use crate::db::SqliteStore;
use crate::error::MatrixError;
use crate::output;
use crate::service::TaskService;

/// Turn a command result into an exit code, reporting errors the way the
/// caller asked for.
pub fn finish(result: Result<i32, MatrixError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json_output);
            1
        }
    }
}

pub fn report_error(e: &MatrixError, json_output: bool) {
    if json_output {
        print_json(&output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
    }
}

pub fn print_json(value: &Value) {
    println!("{value:#}");
}

fn open_service(config: &Config) -> Result<TaskService, MatrixError> {
    let store = SqliteStore::open(&config.database)?;
    Ok(TaskService::new(std::sync::Arc::new(store)))
}

fn reference_or_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}
