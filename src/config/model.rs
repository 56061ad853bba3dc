// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from `Kaname.toml`.
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:8080"
/// frontend_dir = "frontend"
///
/// [paths]
/// commands = "../scripts-dump/commands.json"
/// secrets = "../scripts-dump/.env"
/// python_venv = "../scripts-dump/venv"
/// cold_start_script = "../scripts-dump/cold-start.sh"
/// bash = "/bin/bash"
///
/// [runner]
/// disconnect_grace_ms = 10000
/// ```
///
/// All sections are optional. This is the unvalidated form; see [`Settings`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Static assets served for every path outside `/api`.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("frontend")
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    #[serde(default = "default_commands")]
    pub commands: PathBuf,

    #[serde(default = "default_secrets")]
    pub secrets: PathBuf,

    /// Python scripts run with `<python_venv>/bin/python`.
    #[serde(default = "default_python_venv")]
    pub python_venv: PathBuf,

    #[serde(default = "default_cold_start_script")]
    pub cold_start_script: PathBuf,

    #[serde(default = "default_bash")]
    pub bash: PathBuf,
}

fn default_commands() -> PathBuf {
    PathBuf::from("../scripts-dump/commands.json")
}

fn default_secrets() -> PathBuf {
    PathBuf::from("../scripts-dump/.env")
}

fn default_python_venv() -> PathBuf {
    PathBuf::from("../scripts-dump/venv")
}

fn default_cold_start_script() -> PathBuf {
    PathBuf::from("../scripts-dump/cold-start.sh")
}

fn default_bash() -> PathBuf {
    PathBuf::from("/bin/bash")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            commands: default_commands(),
            secrets: default_secrets(),
            python_venv: default_python_venv(),
            cold_start_script: default_cold_start_script(),
            bash: default_bash(),
        }
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Time a run gets to exit after a client disconnect before it is killed.
    #[serde(default = "default_disconnect_grace_ms")]
    pub disconnect_grace_ms: u64,
}

fn default_disconnect_grace_ms() -> u64 {
    10_000
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            disconnect_grace_ms: default_disconnect_grace_ms(),
        }
    }
}

/// Validated settings used by the rest of the application.
///
/// Only constructible through `TryFrom<RawSettings>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub frontend_dir: PathBuf,
    pub commands_path: PathBuf,
    pub secrets_path: PathBuf,
    pub python_venv: PathBuf,
    pub cold_start_script: PathBuf,
    pub bash: PathBuf,
    pub disconnect_grace: Duration,
}
