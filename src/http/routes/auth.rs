use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::domain::store::TaskStore;
use crate::http::routing::AppState;
use crate::http::types::store_error;

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn router<S: TaskStore + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/auth/register", post(register::<S>))
        .route("/auth/login", post(login::<S>))
        .with_state(state)
}

async fn register<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    // Usernames are not unique; every registration inserts a fresh row.
    let id = state
        .store
        .register_user(&payload.username, &payload.password)
        .await
        .map_err(store_error)?;
    Ok(Json(serde_json::json!({ "id": id.0 })))
}

async fn login<S: TaskStore + Clone>(
    State(state): State<AppState<S>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let id = state
        .store
        .validate_user(&payload.username, &payload.password)
        .await
        .map_err(store_error)?;
    match id {
        Some(id) => Ok(Json(serde_json::json!({ "id": id.0 }))),
        None => Err((StatusCode::UNAUTHORIZED, "invalid credentials".into())),
    }
}
