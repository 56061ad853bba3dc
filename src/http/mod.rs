// src/http/mod.rs

//! HTTP boundary: axum router over the [`Engine`].
//!
//! | method | path            | purpose                                  |
//! |--------|-----------------|------------------------------------------|
//! | GET    | `/api/commands` | catalog as a JSON array                  |
//! | POST   | `/api/run`      | start a run, stream its output           |
//! | POST   | `/api/cancel`   | interrupt a live run                     |
//! | GET    | `/api/env`      | raw secrets file                         |
//! | POST   | `/api/env`      | replace secrets file and reload          |
//! | POST   | `/api/refresh`  | reload the catalog                       |
//!
//! Other paths fall back to the static frontend directory, if configured.

pub mod error;
pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::engine::Engine;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Build the router. `frontend_dir` is served for any non-API path.
pub fn router(engine: Arc<Engine>, frontend_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/api/commands", get(handlers::list_commands))
        .route("/api/run", post(handlers::run_command))
        .route("/api/cancel", post(handlers::cancel_command))
        .route("/api/env", get(handlers::get_env).post(handlers::update_env))
        .route("/api/refresh", post(handlers::refresh_commands))
        .with_state(AppState { engine });

    let app = match frontend_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}
