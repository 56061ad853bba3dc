// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag here overrides the matching value from `Kaname.toml`.

use std::path::PathBuf;

use clap::Parser;

use crate::types::LogLevel;

/// Command-line arguments for `kaname`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "kaname",
    version,
    about = "Local dashboard that runs catalogued scripts and streams their output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Kaname.toml` in the working directory is used when present.
    #[arg(long, value_name = "PATH", env = "KANAME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. `127.0.0.1:8080`.
    #[arg(long, value_name = "ADDR", env = "KANAME_BIND")]
    pub bind: Option<String>,

    /// Path to the JSON command catalog.
    #[arg(long, value_name = "PATH")]
    pub commands: Option<PathBuf>,

    /// Path to the `.env`-style secrets file.
    #[arg(long, value_name = "PATH")]
    pub secrets: Option<PathBuf>,

    /// Directory of static frontend assets.
    #[arg(long, value_name = "DIR")]
    pub frontend_dir: Option<PathBuf>,

    /// Skip the cold-start script even if it exists.
    #[arg(long)]
    pub no_cold_start: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `KANAME_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
