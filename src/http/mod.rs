//! JSON API over [`TaskService`], mounted under `/api/v1`.

mod error;
mod stats;
mod tasks;

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};

use crate::error::MatrixError;
use crate::service::TaskService;

pub use error::status_for;

pub const API_PREFIX: &str = "/api/v1";

pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
    clock: Clock,
}

impl AppState {
    /// Reference date for classification and `days_until_deadline`.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Run a service call on the blocking pool; store access may wait on the
    /// connection lock or the SQLite busy timeout.
    pub async fn call<T, F>(&self, f: F) -> Result<T, MatrixError>
    where
        F: FnOnce(&TaskService) -> Result<T, MatrixError> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| MatrixError::database(format!("task service worker failed: {e}")))?
    }
}

/// Router classifying against the host's local date.
pub fn router(service: TaskService) -> Router {
    router_with_clock(service, Arc::new(|| Local::now().date_naive()))
}

pub fn router_with_clock(service: TaskService, clock: Clock) -> Router {
    let state = AppState { service, clock };

    let api = Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/search", get(tasks::search))
        .route("/tasks/quadrant/{quadrant}", get(tasks::by_quadrant))
        .route("/tasks/status/{status}", get(tasks::by_status))
        .route(
            "/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/tasks/{id}/complete", patch(tasks::complete))
        .route("/stats/tasks/state", get(stats::task_state));

    Router::new()
        .route("/", get(index))
        .route(API_PREFIX, get(index))
        .route(&format!("{API_PREFIX}/"), get(index))
        .nest(API_PREFIX, api)
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "todo-matrix",
        "version": crate::VERSION,
        "description": "Eisenhower matrix task service",
        "endpoints": {
            "tasks": format!("{API_PREFIX}/tasks"),
            "search": format!("{API_PREFIX}/tasks/search?q="),
            "by_quadrant": format!("{API_PREFIX}/tasks/quadrant/{{quadrant}}"),
            "by_status": format!("{API_PREFIX}/tasks/status/{{status}}"),
            "stats": format!("{API_PREFIX}/stats/tasks/state")
        }
    }))
}
