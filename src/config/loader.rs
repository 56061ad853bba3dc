// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawSettings, Settings};

/// Load a configuration file from a given path and return the raw settings.
///
/// This only performs TOML deserialization; use [`load_settings`] for the
/// validated form with CLI overrides applied.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let raw: RawSettings = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(raw)
}

/// Resolve the settings for this process.
///
/// - An explicit `--config` must exist and parse.
/// - Otherwise `Kaname.toml` is used when present, defaults when not.
/// - CLI flags override whatever the file says.
/// - The result is validated.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                load_from_path(&path)?
            } else {
                debug!(path = ?path, "no config file found; using defaults");
                RawSettings::default()
            }
        }
    };

    apply_cli_overrides(&mut raw, args);

    let settings = Settings::try_from(raw).context("validating configuration")?;
    Ok(settings)
}

fn apply_cli_overrides(raw: &mut RawSettings, args: &CliArgs) {
    if let Some(bind) = &args.bind {
        raw.server.bind = bind.clone();
    }
    if let Some(dir) = &args.frontend_dir {
        raw.server.frontend_dir = dir.clone();
    }
    if let Some(commands) = &args.commands {
        raw.paths.commands = commands.clone();
    }
    if let Some(secrets) = &args.secrets {
        raw.paths.secrets = secrets.clone();
    }
}

/// `Kaname.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Kaname.toml")
}
