use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::domain::store::TaskStore;
use crate::domain::task::{Task, TaskId, TaskInput, UserId};
use crate::http::routing::AppState;
use crate::http::types::store_error;

pub fn router<S: TaskStore + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/users/:id/tasks", post(add_task::<S>).get(list_tasks::<S>))
        .route("/users/:id/history", get(list_history::<S>))
        .route("/tasks/:id", put(edit_task::<S>).delete(delete_task::<S>))
        .route("/tasks/:id/complete", post(complete_task::<S>))
        .with_state(state)
}

async fn add_task<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<i64>,
    Json(payload): Json<TaskInput>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let task = state
        .store
        .add_task(UserId(user_id), payload)
        .await
        .map_err(store_error)?;
    Ok(Json(task_json(&task)))
}

async fn list_tasks<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let tasks = state
        .store
        .get_user_tasks(UserId(user_id))
        .await
        .map_err(store_error)?;
    Ok(Json(serde_json::json!({
        "items": tasks.iter().map(task_json).collect::<Vec<_>>()
    })))
}

async fn edit_task<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(task_id): Path<i64>,
    Json(payload): Json<TaskInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .edit_task(TaskId(task_id), payload)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .delete_task(TaskId(task_id))
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_task<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .mark_task_done(TaskId(task_id))
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_history<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let entries = state
        .store
        .get_completed_tasks(UserId(user_id))
        .await
        .map_err(store_error)?;
    Ok(Json(serde_json::json!({
        "items": entries.iter().map(|h| serde_json::json!({
            "history_id": h.id,
            "user_id": h.user_id.0,
            "description": h.description,
            "task_date": h.task_date,
            "task_time": h.task_time,
            "completion_date": h.completion_date,
        })).collect::<Vec<_>>()
    })))
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "task_id": task.id.0,
        "user_id": task.user_id.0,
        "description": task.description,
        "task_date": task.task_date,
        "task_time": task.task_time,
        "notify_date_time": task.notify_at,
        "status": task.status.as_str(),
    })
}
