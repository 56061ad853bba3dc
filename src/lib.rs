// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod http;
pub mod logging;
pub mod secrets;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::cli::CliArgs;
use crate::config::{Settings, load_settings};
use crate::engine::Engine;
use crate::exec::{Interpreters, StopSignal};
use crate::fs::{FileSystem, RealFileSystem};
use crate::secrets::SecretStore;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the optional cold-start script
/// - secret store and command catalog
/// - the run engine and HTTP router
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    info!(bind = %settings.bind, "starting kaname");

    if !args.no_cold_start {
        run_cold_start(&settings).await?;
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let engine = Arc::new(build_engine(&settings, fs)?);

    let frontend_dir = resolve_frontend_dir(&settings);
    let app = http::router(Arc::clone(&engine), frontend_dir);

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("binding {}", settings.bind))?;
    info!(addr = %settings.bind, "server listening");

    serve_until(
        listener,
        app,
        engine,
        shutdown_signal(),
        settings.disconnect_grace,
    )
    .await?;

    info!("server stopped");
    Ok(())
}

/// Serve `app` until `signal` resolves, then stop the live runs.
///
/// On the signal every live run is interrupted so its stream can finish with
/// a final event. Connections still open after `drain` are abandoned and any
/// remaining process groups are killed.
pub async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    engine: Arc<Engine>,
    signal: F,
    drain: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, fired_rx) = oneshot::channel::<()>();
    let shutdown = {
        let engine = Arc::clone(&engine);
        async move {
            signal.await;
            let interrupted = engine.signal_all(StopSignal::Interrupt);
            info!(interrupted, "shutdown requested; interrupted live runs");
            let _ = fired_tx.send(());
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();
    tokio::pin!(server);

    let deadline = async {
        match fired_rx.await {
            Ok(()) => tokio::time::sleep(drain).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        served = &mut server => served.context("serving HTTP"),
        _ = deadline => {
            let killed = engine.signal_all(StopSignal::Kill);
            warn!(?drain, killed, "runs still streaming after shutdown grace; exiting");
            Ok(())
        }
    }
}

/// Load secrets and the catalog and assemble the [`Engine`].
///
/// A broken secrets file only produces a warning; a broken catalog is fatal.
pub fn build_engine(settings: &Settings, fs: Arc<dyn FileSystem>) -> Result<Engine> {
    let secrets = Arc::new(SecretStore::new(Arc::clone(&fs), &settings.secrets_path));
    if let Err(e) = secrets.reload() {
        warn!(error = %e, "could not load environment variables");
    }

    let catalog = Catalog::load(fs, &settings.commands_path).with_context(|| {
        format!("loading commands from {:?}", settings.commands_path)
    })?;

    Ok(Engine::new(
        Arc::new(catalog),
        secrets,
        Interpreters::new(&settings.bash, &settings.python_venv),
        settings.disconnect_grace,
    ))
}

/// Run the cold-start script, if present, before anything else.
///
/// The script inherits our stdio; a non-zero exit aborts startup.
async fn run_cold_start(settings: &Settings) -> Result<()> {
    let script = &settings.cold_start_script;
    if !script.is_file() {
        return Ok(());
    }

    info!(script = ?script, "executing cold-start script");
    let status = tokio::process::Command::new(&settings.bash)
        .arg(script)
        .status()
        .await
        .with_context(|| format!("starting cold-start script {:?}", script))?;

    if !status.success() {
        bail!("cold-start script {:?} failed: {status}", script);
    }
    info!("cold-start script completed successfully");
    Ok(())
}

fn resolve_frontend_dir(settings: &Settings) -> Option<PathBuf> {
    if settings.frontend_dir.is_dir() {
        info!(dir = ?settings.frontend_dir, "serving frontend");
        Some(settings.frontend_dir.clone())
    } else {
        warn!(dir = ?settings.frontend_dir, "frontend directory not found; serving API only");
        None
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawSettings;
    use crate::fs::mock::MockFileSystem;

    fn settings() -> Settings {
        let mut raw = RawSettings::default();
        raw.paths.commands = "/cfg/commands.json".into();
        raw.paths.secrets = "/cfg/.env".into();
        Settings::try_from(raw).unwrap()
    }

    #[test]
    fn build_engine_bootstraps_missing_files() {
        let fs = MockFileSystem::new();
        let engine = build_engine(&settings(), Arc::new(fs.clone())).unwrap();

        assert!(engine.catalog().get("placeholder").is_some());
        assert!(fs.contents("/cfg/commands.json").is_some());
        assert!(engine.secrets().snapshot().is_empty());
    }

    #[test]
    fn broken_secrets_warn_but_broken_catalog_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("/cfg/commands.json", "[]");
        fs.add_file("/cfg/.env", vec![0xff, 0xfe]);
        let engine = build_engine(&settings(), Arc::new(fs.clone())).unwrap();
        assert!(engine.catalog().list().is_empty());

        fs.add_file("/cfg/commands.json", "{ not a list");
        assert!(build_engine(&settings(), Arc::new(fs)).is_err());
    }
}
