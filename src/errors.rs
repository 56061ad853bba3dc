// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Errors raised before a child process starts map onto HTTP statuses (see
//! `http::error`). Errors after streaming has begun never reach this type;
//! they travel in-band as the terminal `system` event.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanameError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Unsupported script type: {0}")]
    UnsupportedScriptType(String),

    #[error("Task is already running: {0}")]
    DuplicateRun(String),

    #[error("Command not found or already stopped: {0}")]
    RunNotFound(String),

    #[error("Failed to start command '{command}': {reason}")]
    SpawnFailure { command: String, reason: String },

    #[error("Failed to interrupt command '{run_id}': {reason}")]
    SignalFailure { run_id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, KanameError>;
