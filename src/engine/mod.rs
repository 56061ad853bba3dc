// src/engine/mod.rs

//! Run orchestration for the dashboard.
//!
//! [`Engine`] is the single entry point the HTTP layer talks to. It validates
//! a [`RunRequest`] against the catalog, builds the command line, launches
//! and supervises the process, and serves cancel requests from the registry.

pub mod requests;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::errors::{KanameError, Result};
use crate::exec::{
    Delivery, Interpreters, Launcher, ProcessRegistry, StopSignal, SupervisedRun,
    build_invocation, signal_run, supervise,
};
use crate::secrets::SecretStore;

pub use requests::{CancelRequest, RunRequest};

/// Shared state behind every run and cancel request.
#[derive(Debug)]
pub struct Engine {
    catalog: Arc<Catalog>,
    secrets: Arc<SecretStore>,
    launcher: Launcher,
    interpreters: Interpreters,
    disconnect_grace: Duration,
}

impl Engine {
    pub fn new(
        catalog: Arc<Catalog>,
        secrets: Arc<SecretStore>,
        interpreters: Interpreters,
        disconnect_grace: Duration,
    ) -> Self {
        Self {
            catalog,
            secrets,
            launcher: Launcher::default(),
            interpreters,
            disconnect_grace,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    pub fn registry(&self) -> &ProcessRegistry {
        self.launcher.registry()
    }

    /// Validate `req`, start the process and return its event stream.
    ///
    /// Errors are all raised before anything is streamed: unknown command,
    /// duplicate run, unsupported script type, spawn failure.
    pub fn start_run(&self, req: &RunRequest) -> Result<SupervisedRun> {
        let def = self
            .catalog
            .get(&req.id)
            .ok_or_else(|| KanameError::CommandNotFound(req.id.clone()))?;

        // Cheap early rejection; `launch` re-checks under the registry lock.
        if self.registry().contains(&def.id) {
            return Err(KanameError::DuplicateRun(def.id.clone()));
        }

        let missing = def.missing_required(&req.params);
        if !missing.is_empty() {
            warn!(run_id = %def.id, ?missing, "required parameters not supplied; running anyway");
        }

        let secrets = self.secrets.snapshot();
        let invocation = build_invocation(&def, &req.params, &secrets, &self.interpreters)?;

        let launched = self.launcher.launch(&def.id, &invocation)?;
        Ok(supervise(launched, def.name.clone(), self.disconnect_grace))
    }

    /// Send `signal` to every live run. Returns how many were reached.
    ///
    /// Used on shutdown; each supervisor still reaps and reports its own run.
    pub fn signal_all(&self, signal: StopSignal) -> usize {
        let mut reached = 0;
        for (run_id, handle) in self.registry().live_handles() {
            match signal_run(&run_id, handle, signal) {
                Ok(_) => reached += 1,
                Err(e) => warn!(run_id = %run_id, error = %e, ?signal, "failed to signal run on shutdown"),
            }
        }
        reached
    }

    /// Interrupt the live run `run_id`.
    ///
    /// Reports whether the signal was delivered, not whether the process has
    /// exited; the streaming side observes and classifies the exit.
    pub fn cancel(&self, run_id: &str) -> Result<Delivery> {
        let Some(handle) = self.registry().lookup(run_id) else {
            warn!(run_id, "cancel request for command that is not running");
            return Err(KanameError::RunNotFound(run_id.to_string()));
        };

        let delivery = signal_run(run_id, handle, StopSignal::Interrupt).map_err(|e| {
            KanameError::SignalFailure {
                run_id: run_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        info!(run_id, pid = handle.pid, ?delivery, "sent interrupt signal to command");
        Ok(delivery)
    }
}
