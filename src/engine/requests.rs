// src/engine/requests.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/run`.
///
/// `id` is both the command id and the run id, so a command can only have
/// one run in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Missing `id` decodes as empty and then fails the catalog lookup.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl RunRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: HashMap::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Body of `POST /api/cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub id: String,
}
