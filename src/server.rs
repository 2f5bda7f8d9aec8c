//! HTTP boundary for taskling (feature `server`).
//!
//! A thin axum layer over the parser and the store:
//!
//! - `GET  /health` — server status
//! - `GET  /tasks?done=&sort=` — list tasks with optional filter/sort
//! - `POST /add` — parse a raw command and create the task
//! - `POST /mark-by-name` — mark a task done by name
//! - `POST /delete-by-name` — delete a task by name
//! - `POST /toggle` — flip done/undone by id
//! - `POST /delete` — delete by id
//! - `POST /clear-completed` — remove completed tasks
//! - `POST /clear` — remove all tasks
//!
//! Build and run: `cargo run --features server --bin taskling-server`

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::classify::TextClassifier;
use crate::command::CommandParser;
use crate::error::StoreError;
use crate::store::{DoneFilter, TaskSort, TaskStore};
use crate::task::Task;

// ── Server state ──────────────────────────────────────────────────────────

/// Shared state: the parser, the store, and the optional diagnostics-only
/// intent model.
pub struct AppState {
    pub parser: CommandParser,
    pub store: TaskStore,
    pub intent_model: Option<Arc<TextClassifier>>,
}

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks))
        .route("/add", post(add_task))
        .route("/mark-by-name", post(mark_by_name))
        .route("/delete-by-name", post(delete_by_name))
        .route("/toggle", post(toggle_task))
        .route("/delete", post(delete_task))
        .route("/clear-completed", post(clear_completed))
        .route("/clear", post(clear_all))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Request / response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct AddRequest {
    #[serde(default)]
    task: String,
}

#[derive(Deserialize)]
struct NameRequest {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct IdRequest {
    #[serde(default)]
    id: Option<Uuid>,
}

#[derive(Deserialize)]
struct ListQuery {
    done: Option<String>,
    sort: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    tasks: usize,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct TaskResponse {
    message: String,
    task: Task,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::DuplicateName { .. } => {
            api_error(StatusCode::CONFLICT, "Task already exists")
        }
        StoreError::NotFound { wanted } => api_error(
            StatusCode::NOT_FOUND,
            format!("Task '{wanted}' not found"),
        ),
        other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let tasks = state.store.len().map_err(store_error)?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tasks,
    }))
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = DoneFilter::from_query(query.done.as_deref());
    let sort = TaskSort::from_query(query.sort.as_deref());
    let tasks = state.store.list(filter, sort).map_err(store_error)?;
    Ok(Json(tasks))
}

/// Main entry for creating tasks: parse the raw command, then store it.
async fn add_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let raw = request.task.trim();
    if raw.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No task name provided"));
    }

    // Intent inspection only; routing never depends on it.
    if let Some(model) = &state.intent_model {
        match model.predict(raw) {
            Ok(intent) => tracing::debug!(intent, text = raw, "intent model prediction"),
            Err(e) => tracing::debug!(error = %e, "intent model prediction failed"),
        }
    }

    let parsed = state.parser.parse(raw);
    if parsed.name.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Empty task name after parsing",
        ));
    }

    let task = Task::new(parsed.name, parsed.priority, parsed.category, parsed.due_date);
    state.store.insert(&task).map_err(store_error)?;

    let message = task.confirmation_message();
    Ok((StatusCode::CREATED, Json(TaskResponse { message, task })))
}

async fn mark_by_name(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NameRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No task name provided"));
    }
    let task = state.store.set_done_by_name(name).map_err(store_error)?;
    Ok(Json(TaskResponse {
        message: format!("Marked {} as done", task.name),
        task,
    }))
}

async fn delete_by_name(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NameRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No task name provided"));
    }
    let task = state.store.remove_by_name(name).map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: format!("Deleted {}", task.name),
    }))
}

async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = request
        .id
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No task id provided"))?;
    let task = state.store.toggle(id).map_err(store_error)?;
    let message = if task.done {
        format!("Marked {} as done", task.name)
    } else {
        format!("Marked {} as undone", task.name)
    };
    Ok(Json(TaskResponse { message, task }))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = request
        .id
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No task id provided"))?;
    let task = state.store.remove(id).map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: format!("Deleted {}", task.name),
    }))
}

async fn clear_completed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.clear_completed().map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: "Completed tasks cleared".to_string(),
    }))
}

async fn clear_all(State(state): State<Arc<AppState>>) -> Result<Json<MessageResponse>, ApiError> {
    state.store.clear_all().map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: "All tasks cleared".to_string(),
    }))
}
