use axum::{Router, routing::get};

use crate::domain::store::TaskStore;
use crate::http::routes::{auth, tasks};

#[derive(Clone)]
pub struct AppState<S: TaskStore + Clone> {
    pub store: S,
}

pub fn app<S: TaskStore + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router(state.clone()))
        .merge(tasks::router(state))
}
