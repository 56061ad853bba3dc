// src/http/handlers.rs

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

use super::AppState;
use crate::catalog::CommandDefinition;
use crate::engine::{CancelRequest, Engine, RunRequest};
use crate::errors::{KanameError, Result};
use crate::exec::StreamEvent;

/// Content type of the run output stream: one JSON object per line.
pub const JSON_STREAM_CONTENT_TYPE: &str = "application/x-json-stream";

/// `GET /api/commands`
pub async fn list_commands(State(state): State<AppState>) -> Json<Vec<CommandDefinition>> {
    Json(state.engine.catalog().list())
}

/// `POST /api/run`
///
/// Everything that can fail before the process starts is an HTTP error.
/// Once the response has started, failures only appear as the final
/// `system` event.
pub async fn run_command(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req: RunRequest = parse_json(&body)?;
    let run = state.engine.start_run(&req)?;

    // Each event becomes its own body frame, so hyper flushes per line.
    let stream = ReceiverStream::new(run.events).filter_map(encode_event);

    let mut response = Response::new(Body::from_stream(stream));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_STREAM_CONTENT_TYPE),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    Ok(response)
}

fn encode_event(event: StreamEvent) -> Option<std::result::Result<Bytes, Infallible>> {
    match event.to_json_line() {
        Ok(line) => Some(Ok(Bytes::from(line))),
        Err(e) => {
            error!(error = %e, "failed to write stream message");
            None
        }
    }
}

/// `POST /api/cancel`
pub async fn cancel_command(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req: CancelRequest = parse_json(&body)?;
    state.engine.cancel(&req.id)?;
    Ok((StatusCode::OK, "Interrupt signal sent.\n").into_response())
}

/// `GET /api/env`
pub async fn get_env(State(state): State<AppState>) -> Result<Response> {
    let contents = blocking(&state.engine, |engine| engine.secrets().raw_contents()).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], contents).into_response())
}

/// `POST /api/env`
pub async fn update_env(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    blocking(&state.engine, move |engine| {
        engine.secrets().replace_contents(&body)
    })
    .await?;
    info!("environment variables updated");
    Ok((StatusCode::OK, "Environment variables updated successfully.\n").into_response())
}

/// `POST /api/refresh`
pub async fn refresh_commands(State(state): State<AppState>) -> Result<Response> {
    info!("received refresh request; reloading commands");
    blocking(&state.engine, |engine| engine.catalog().reload()).await?;
    Ok((StatusCode::OK, "Command list refreshed successfully.\n").into_response())
}

/// Parse a request body as JSON regardless of its declared content type.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| KanameError::InvalidRequest(format!("Invalid request body: {e}")))
}

/// Run file-backed store work off the async workers.
async fn blocking<T, F>(engine: &Arc<Engine>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Engine) -> Result<T> + Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| KanameError::Other(e.into()))?
}
