// src/exec/supervisor.rs

//! Supervisor: owns a launched run until it is reaped.
//!
//! Events flow multiplexer → supervisor → consumer. The supervisor selects
//! between the next merged event and the consumer going away:
//!
//! - merged channel closed: reap the child, free the registry slot, emit the
//!   classification as the terminal `system` event.
//! - consumer gone (client disconnect): interrupt the process group, reap the
//!   child (escalating to SIGKILL after the grace period), free the slot and
//!   emit nothing further.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::event::StreamEvent;
use super::launcher::LaunchedRun;
use super::multiplex::spawn_multiplexer;
use super::outcome::RunOutcome;
use super::signal::{StopSignal, signal_run};

/// Capacity of the channel towards the consumer.
pub const OUTPUT_CHANNEL_CAPACITY: usize = 1;

/// Default time a disconnected run gets to honour the interrupt.
pub const DEFAULT_DISCONNECT_GRACE: Duration = Duration::from_secs(10);

/// How a supervised run finished, for callers that wait on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCompletion {
    /// Streamed to the end; carries the classification.
    Finished(RunOutcome),
    /// The consumer went away first; the process was stopped.
    Abandoned,
}

/// A supervised run: the event stream for the consumer plus the task handle.
#[derive(Debug)]
pub struct SupervisedRun {
    pub pid: u32,
    pub events: mpsc::Receiver<StreamEvent>,
    pub task: JoinHandle<RunCompletion>,
}

/// Start streaming `run` under a new supervisor task.
///
/// `label` is the human-readable command name used in the start banner.
pub fn supervise(run: LaunchedRun, label: impl Into<String>, grace: Duration) -> SupervisedRun {
    let (tx, rx) = mpsc::channel::<StreamEvent>(OUTPUT_CHANNEL_CAPACITY);
    let pid = run.handle.pid;
    let task = tokio::spawn(drive(run, label.into(), grace, tx));
    SupervisedRun {
        pid,
        events: rx,
        task,
    }
}

async fn drive(
    run: LaunchedRun,
    label: String,
    grace: Duration,
    out: mpsc::Sender<StreamEvent>,
) -> RunCompletion {
    let LaunchedRun {
        run_id,
        handle,
        mut child,
        stdout,
        stderr,
        guard,
    } = run;

    let mut merged = spawn_multiplexer(stdout, stderr);

    let banner = StreamEvent::system(format!("Starting command: {label} (PID: {})", handle.pid));
    let mut connected = out.send(banner).await.is_ok();

    while connected {
        tokio::select! {
            next = merged.recv() => match next {
                Some(event) => connected = out.send(event).await.is_ok(),
                None => break,
            },
            _ = out.closed() => connected = false,
        }
    }

    if !connected {
        warn!(run_id = %run_id, pid = handle.pid, "client disconnected; sending interrupt");
        // Stop reading; the readers exit once the pipes close or their next send fails.
        drop(merged);
        stop_abandoned(&run_id, handle, &mut child, grace).await;
        drop(guard);
        info!(run_id = %run_id, "cleaned up process map after disconnect");
        return RunCompletion::Abandoned;
    }

    let outcome = RunOutcome::classify(child.wait().await);
    drop(guard);
    debug!(run_id = %run_id, "cleaned up process map");

    match &outcome {
        RunOutcome::Succeeded => info!(run_id = %run_id, "command completed successfully"),
        RunOutcome::Cancelled => info!(run_id = %run_id, "command was cancelled by user"),
        RunOutcome::Failed(reason) | RunOutcome::WaitFailed(reason) => {
            error!(run_id = %run_id, reason = %reason, "command failed")
        }
    }

    if out.send(StreamEvent::system(outcome.message())).await.is_err() {
        debug!(run_id = %run_id, "client gone before the final event");
    }
    RunCompletion::Finished(outcome)
}

/// Interrupt the group, wait up to `grace`, then kill the group and reap.
async fn stop_abandoned(
    run_id: &str,
    handle: super::registry::RunHandle,
    child: &mut tokio::process::Child,
    grace: Duration,
) {
    if let Err(e) = signal_run(run_id, handle, StopSignal::Interrupt) {
        error!(run_id, error = %e, "failed to interrupt process for disconnected client");
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => debug!(run_id, %status, "disconnected run exited"),
        Ok(Err(e)) => warn!(run_id, error = %e, "error waiting for disconnected run"),
        Err(_) => {
            warn!(run_id, ?grace, "run ignored interrupt; killing process group");
            if let Err(e) = signal_run(run_id, handle, StopSignal::Kill) {
                error!(run_id, error = %e, "failed to kill process group");
            }
            if let Err(e) = child.kill().await {
                warn!(run_id, error = %e, "failed to kill child process");
            }
        }
    }
}
