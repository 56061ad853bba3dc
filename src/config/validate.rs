// src/config/validate.rs

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::config::model::{RawSettings, Settings};
use crate::errors::{KanameError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = KanameError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        let bind = parse_bind(&raw.server.bind)?;
        validate_paths(&raw)?;

        if raw.runner.disconnect_grace_ms == 0 {
            return Err(KanameError::ConfigError(
                "[runner].disconnect_grace_ms must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(Settings {
            bind,
            frontend_dir: raw.server.frontend_dir,
            commands_path: raw.paths.commands,
            secrets_path: raw.paths.secrets,
            python_venv: raw.paths.python_venv,
            cold_start_script: raw.paths.cold_start_script,
            bash: raw.paths.bash,
            disconnect_grace: Duration::from_millis(raw.runner.disconnect_grace_ms),
        })
    }
}

fn parse_bind(bind: &str) -> Result<SocketAddr> {
    bind.trim().parse::<SocketAddr>().map_err(|e| {
        KanameError::ConfigError(format!("[server].bind '{bind}' is not a socket address: {e}"))
    })
}

fn validate_paths(raw: &RawSettings) -> Result<()> {
    let named: [(&str, &Path); 5] = [
        ("commands", &raw.paths.commands),
        ("secrets", &raw.paths.secrets),
        ("python_venv", &raw.paths.python_venv),
        ("cold_start_script", &raw.paths.cold_start_script),
        ("bash", &raw.paths.bash),
    ];

    for (key, path) in named {
        if path.as_os_str().is_empty() {
            return Err(KanameError::ConfigError(format!(
                "[paths].{key} must not be empty"
            )));
        }
    }
    Ok(())
}
