use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::MatrixError;
use crate::http::AppState;
use crate::models::{CreateTask, UpdateTask};
use crate::output::json::{task_json, tasks_json};

type ApiResult<T> = Result<T, MatrixError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let tasks = state.call(|svc| svc.list()).await?;
    Ok(Json(tasks_json(&tasks, state.today())))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let task = state.call(move |svc| svc.get(id)).await?;
    Ok(Json(task_json(&task, state.today())))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = body?;
    let today = state.today();
    let task = state.call(move |svc| svc.create(req, today)).await?;
    Ok((StatusCode::CREATED, Json(task_json(&task, today))))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(req) = body?;
    let today = state.today();
    let task = state.call(move |svc| svc.update(id, req, today)).await?;
    Ok(Json(task_json(&task, today)))
}

pub async fn complete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let task = state.call(move |svc| svc.complete(id)).await?;
    Ok(Json(task_json(&task, state.today())))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.call(move |svc| svc.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_quadrant(
    State(state): State<AppState>,
    Path(quadrant): Path<String>,
) -> ApiResult<Json<Value>> {
    let tasks = state.call(move |svc| svc.by_quadrant(&quadrant)).await?;
    Ok(Json(tasks_json(&tasks, state.today())))
}

pub async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<Json<Value>> {
    let tasks = state.call(move |svc| svc.by_status(&status)).await?;
    Ok(Json(tasks_json(&tasks, state.today())))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Value>> {
    let query = params.q.unwrap_or_default();
    debug!(query = %query, "task search");
    let tasks = state.call(move |svc| svc.search(&query)).await?;
    Ok(Json(tasks_json(&tasks, state.today())))
}
