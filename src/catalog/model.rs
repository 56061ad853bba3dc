// src/catalog/model.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ParamType, ScriptType};

/// One runnable script as described in `commands.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub script_path: String,
    pub script_type: ScriptType,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub icon: String,
}

impl CommandDefinition {
    /// Names of `required` parameters that `params` does not supply.
    pub fn missing_required(&self, params: &HashMap<String, String>) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required && !params.contains_key(&p.name))
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// A single parameter of a [`CommandDefinition`].
///
/// `name` doubles as the flag token passed to the script (e.g. `--verbose`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    /// Choices for the UI only; never validated here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}
