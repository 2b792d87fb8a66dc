use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::MatrixError;
use crate::http::AppState;
use crate::output::json::stats_json;

pub async fn task_state(State(state): State<AppState>) -> Result<Json<Value>, MatrixError> {
    let stats = state.call(|svc| svc.stats()).await?;
    Ok(Json(stats_json(&stats)))
}
