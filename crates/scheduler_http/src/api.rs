//! HTTP use-case API for the web client.
//!
//! # Responsibility
//! - Translate query strings and JSON bodies into lifecycle service calls.
//! - Keep the wire format stable: string identifiers, `YYYYMMDD` dates.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an `ApiError`.
//! - Business rules live in `scheduler_core`, never here.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use scheduler_core::{Task, TaskDate, TaskDraft, TaskId, TaskUpdate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Query parameters of `GET /api/nextdate`.
#[derive(Debug, Default, Deserialize)]
pub struct NextDateParams {
    pub now: Option<String>,
    pub date: Option<String>,
    pub repeat: Option<String>,
}

/// `?id=` query parameter shared by single-task endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

/// Body of `POST /api/task`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskRequest {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Body of `PUT /api/task`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskUpdateRequest {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Task as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            date: task.date.format(),
            title: task.title,
            comment: task.comment,
            repeat: task.repeat.to_string(),
        }
    }
}

/// Body of `GET /api/tasks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskResponse>,
}

/// Body of `POST /api/task`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// `GET /api/nextdate?now=&date=&repeat=`
///
/// Responds with the bare `YYYYMMDD` date as `text/plain`.
pub async fn next_date(
    State(state): State<AppState>,
    Query(params): Query<NextDateParams>,
) -> Result<String, ApiError> {
    let now = params.now.unwrap_or_default();
    let date = params.date.unwrap_or_default();
    let repeat = params.repeat.unwrap_or_default();
    if now.is_empty() || date.is_empty() || repeat.is_empty() {
        return Err(ApiError::bad_request(
            "missing required query parameters: now, date, repeat",
        ));
    }

    let now = TaskDate::parse(&now)
        .map_err(|err| ApiError::bad_request(format!("invalid now parameter: {err}")))?;

    let next = state
        .run(move |service| service.next_date(now, &date, &repeat))
        .await?;
    Ok(next.format())
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<TasksResponse>, ApiError> {
    let tasks = state.run(|service| service.list_tasks(None)).await?;
    Ok(Json(TasksResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// `POST /api/task`
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::bad_request("invalid JSON format"))?;
    let draft = TaskDraft {
        date: request.date,
        title: request.title,
        comment: request.comment,
        repeat: request.repeat,
    };

    let id = state.run(move |service| service.create_task(&draft)).await?;
    Ok(Json(CreatedResponse { id: id.to_string() }))
}

/// `GET /api/task?id=`
pub async fn get_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_id_param(params.id.as_deref())?;
    let task = state.run(move |service| service.get_task(id)).await?;
    Ok(Json(task.into()))
}

/// `PUT /api/task`
pub async fn update_task(
    State(state): State<AppState>,
    body: Result<Json<TaskUpdateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::bad_request("invalid JSON format"))?;
    let update = TaskUpdate {
        id: parse_body_id(&request.id)?,
        date: request.date,
        title: request.title,
        comment: request.comment,
        repeat: request.repeat,
    };

    state.run(move |service| service.update_task(&update)).await?;
    Ok(Json(json!({})))
}

/// `POST /api/task/done?id=`
pub async fn mark_done(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id_param(params.id.as_deref())?;
    state.run(move |service| service.mark_done(id)).await?;
    Ok(Json(json!({})))
}

/// `DELETE /api/task?id=`
pub async fn delete_task(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id_param(params.id.as_deref())?;
    state.run(move |service| service.delete_task(id)).await?;
    Ok(Json(json!({})))
}

fn parse_id_param(raw: Option<&str>) -> Result<TaskId, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Err(ApiError::bad_request("missing required parameter: id")),
        Some(value) => value
            .parse::<TaskId>()
            .map_err(|_| ApiError::bad_request("invalid ID format for parameter: id")),
    }
}

/// Empty or `"0"` means absent; the service reports it as a missing ID.
fn parse_body_id(raw: &str) -> Result<Option<TaskId>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<TaskId>()
        .map(Some)
        .map_err(|_| ApiError::bad_request("invalid task ID format"))
}
