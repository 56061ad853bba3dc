// src/http/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::KanameError;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl KanameError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            KanameError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            KanameError::UnsupportedScriptType(_) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_SCRIPT_TYPE")
            }
            KanameError::CommandNotFound(_) => (StatusCode::NOT_FOUND, "COMMAND_NOT_FOUND"),
            KanameError::RunNotFound(_) => (StatusCode::NOT_FOUND, "RUN_NOT_FOUND"),
            KanameError::DuplicateRun(_) => (StatusCode::CONFLICT, "DUPLICATE_RUN"),
            KanameError::SpawnFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SPAWN_FAILURE")
            }
            KanameError::SignalFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SIGNAL_FAILURE")
            }
            KanameError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            KanameError::IoError(_)
            | KanameError::JsonError(_)
            | KanameError::TomlError(_)
            | KanameError::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for KanameError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status() {
        let cases = [
            (KanameError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (KanameError::UnsupportedScriptType("ruby".into()), StatusCode::BAD_REQUEST),
            (KanameError::CommandNotFound("x".into()), StatusCode::NOT_FOUND),
            (KanameError::RunNotFound("x".into()), StatusCode::NOT_FOUND),
            (KanameError::DuplicateRun("x".into()), StatusCode::CONFLICT),
            (
                KanameError::SpawnFailure {
                    command: "x".into(),
                    reason: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
