// src/catalog/loader.rs

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use crate::catalog::model::CommandDefinition;
use crate::errors::{KanameError, Result};
use crate::fs::FileSystem;
use crate::types::ScriptType;

/// Read and parse the catalog at `path`.
///
/// A missing file is replaced by a one-entry placeholder catalog so the
/// dashboard still comes up; the placeholder is written back to `path`.
pub fn load_definitions(fs: &dyn FileSystem, path: &Path) -> Result<Vec<CommandDefinition>> {
    if !fs.exists(path) {
        warn!(path = ?path, "command catalog not found; writing placeholder, please configure it");
        let placeholder = placeholder_catalog();
        let data = serde_json::to_vec_pretty(&placeholder)?;
        if let Err(e) = fs.write(path, &data) {
            warn!(path = ?path, error = %e, "could not write placeholder catalog");
        }
        return Ok(placeholder);
    }

    let contents = fs
        .read_to_string(path)
        .map_err(|e| KanameError::ConfigError(format!("failed to read commands file: {e:#}")))?;

    parse_definitions(&contents)
}

/// Parse a JSON array of command definitions and check id uniqueness.
pub fn parse_definitions(contents: &str) -> Result<Vec<CommandDefinition>> {
    let commands: Vec<CommandDefinition> = serde_json::from_str(contents).map_err(|e| {
        KanameError::ConfigError(format!("failed to unmarshal commands JSON: {e}"))
    })?;

    let mut seen = HashSet::new();
    for cmd in &commands {
        if !seen.insert(cmd.id.as_str()) {
            return Err(KanameError::ConfigError(format!(
                "duplicate command id '{}'",
                cmd.id
            )));
        }
    }

    Ok(commands)
}

fn placeholder_catalog() -> Vec<CommandDefinition> {
    vec![CommandDefinition {
        id: "placeholder".to_string(),
        name: "Placeholder Command".to_string(),
        description: "This is a placeholder. Please configure your commands.json.".to_string(),
        script_path: "/bin/echo".to_string(),
        script_type: ScriptType::Bash,
        parameters: Vec::new(),
        icon: "fa-question-circle".to_string(),
    }]
}
