// src/exec/launcher.rs

//! Launcher: claim the run id, start the child in its own process group and
//! hand back its pipes.

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{error, info};

use super::args::Invocation;
use super::registry::{ProcessRegistry, RunGuard, RunHandle};
use crate::errors::{KanameError, Result};

/// A started child whose registry slot is owned by `guard`.
///
/// Dropping this value kills the child (`kill_on_drop`) and frees the slot.
#[derive(Debug)]
pub struct LaunchedRun {
    pub run_id: String,
    pub handle: RunHandle,
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
    pub guard: RunGuard,
}

/// Starts processes and records them in the [`ProcessRegistry`].
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    registry: ProcessRegistry,
}

impl Launcher {
    pub fn new(registry: ProcessRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Start `invocation` as run `run_id`.
    ///
    /// Fails with `DuplicateRun` without spawning if the id is taken, and with
    /// `SpawnFailure` if the process or its pipes cannot be created; in both
    /// cases no registry entry is left behind.
    pub fn launch(&self, run_id: &str, invocation: &Invocation) -> Result<LaunchedRun> {
        let guard = self
            .registry
            .try_reserve(run_id)
            .ok_or_else(|| KanameError::DuplicateRun(run_id.to_string()))?;

        info!(
            run_id,
            executable = ?invocation.executable,
            args = ?invocation.args,
            "executing command"
        );

        let mut cmd = Command::new(&invocation.executable);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group so one signal reaches the script and its children.
        #[cfg(unix)]
        cmd.process_group(0);

        let spawn_failure = |reason: String| {
            error!(run_id, reason = %reason, "failed to start command");
            KanameError::SpawnFailure {
                command: run_id.to_string(),
                reason,
            }
        };

        let mut child = cmd.spawn().map_err(|e| spawn_failure(e.to_string()))?;

        let pid = child
            .id()
            .ok_or_else(|| spawn_failure("process exited before its pid was read".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_failure("failed to create stdout pipe".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| spawn_failure("failed to create stderr pipe".to_string()))?;

        let handle = RunHandle::new(pid);
        guard.attach(handle);
        info!(run_id, pid, "command started");

        Ok(LaunchedRun {
            run_id: run_id.to_string(),
            handle,
            child,
            stdout,
            stderr,
            guard,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn invocation(exe: &str, args: &[&str]) -> Invocation {
        Invocation {
            executable: PathBuf::from(exe),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn launch_registers_and_guard_drop_deregisters() {
        let launcher = Launcher::default();
        let mut run = launcher
            .launch("job", &invocation("/bin/sh", &["-c", "exit 0"]))
            .unwrap();

        assert_eq!(launcher.registry().lookup("job"), Some(run.handle));
        run.child.wait().await.unwrap();

        drop(run);
        assert!(launcher.registry().is_empty());
    }

    #[tokio::test]
    async fn duplicate_launch_is_rejected_without_touching_the_first() {
        let launcher = Launcher::default();
        let first = launcher
            .launch("job", &invocation("/bin/sh", &["-c", "sleep 5"]))
            .unwrap();

        let err = launcher
            .launch("job", &invocation("/bin/sh", &["-c", "exit 0"]))
            .unwrap_err();
        assert!(matches!(err, KanameError::DuplicateRun(ref id) if id == "job"));
        assert_eq!(launcher.registry().lookup("job"), Some(first.handle));
    }

    #[tokio::test]
    async fn spawn_failure_leaves_registry_empty() {
        let launcher = Launcher::default();
        let err = launcher
            .launch("job", &invocation("/definitely/not/an/interpreter", &[]))
            .unwrap_err();

        assert!(matches!(err, KanameError::SpawnFailure { .. }));
        assert!(launcher.registry().is_empty());
    }

    #[tokio::test]
    async fn child_leads_its_own_process_group() {
        let launcher = Launcher::default();
        let mut run = launcher
            .launch("pg", &invocation("/bin/sh", &["-c", "sleep 5"]))
            .unwrap();

        // SAFETY: getpgid has no memory-safety preconditions.
        let pgid = unsafe { libc::getpgid(run.handle.pid as libc::pid_t) };
        assert_eq!(pgid, run.handle.pid as libc::pid_t);

        run.child.kill().await.unwrap();
    }
}
