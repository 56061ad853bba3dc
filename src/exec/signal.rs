// src/exec/signal.rs

//! Signal delivery to a run's process group.
//!
//! The child is spawned as the leader of its own process group, so signalling
//! `-pgid` reaches the script and everything it started. If the group cannot
//! be signalled, the direct child is signalled instead.

use std::io;

use tracing::{error, info};

use super::registry::RunHandle;

/// Signals sent by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Graceful stop; an exit caused by this signal counts as a cancellation.
    Interrupt,
    /// Escalation after the disconnect grace period.
    Kill,
}

impl StopSignal {
    #[cfg(unix)]
    fn as_raw(self) -> libc::c_int {
        match self {
            StopSignal::Interrupt => libc::SIGINT,
            StopSignal::Kill => libc::SIGKILL,
        }
    }
}

/// Which target actually received the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    ProcessGroup,
    ProcessOnly,
}

/// Send `signal` to the process group of `handle`, falling back to the
/// process itself.
///
/// Only reports whether the signal was sent; it does not wait for the process
/// to exit.
pub fn signal_run(run_id: &str, handle: RunHandle, signal: StopSignal) -> io::Result<Delivery> {
    match signal_group(handle.pgid, signal) {
        Ok(()) => {
            info!(run_id, pid = handle.pid, ?signal, "signalled process group");
            Ok(Delivery::ProcessGroup)
        }
        Err(group_err) => {
            error!(
                run_id,
                pid = handle.pid,
                error = %group_err,
                "failed to signal process group; falling back to the process"
            );
            match signal_process(handle.pid, signal) {
                Ok(()) => {
                    info!(run_id, pid = handle.pid, ?signal, "signalled process");
                    Ok(Delivery::ProcessOnly)
                }
                Err(proc_err) => {
                    error!(run_id, pid = handle.pid, error = %proc_err, "fallback signal to process also failed");
                    Err(proc_err)
                }
            }
        }
    }
}

/// Whether `raw` (as reported by `ExitStatusExt::signal`) is `signal`.
#[cfg(unix)]
pub fn is_signal(raw: i32, signal: StopSignal) -> bool {
    raw == signal.as_raw()
}

#[cfg(unix)]
fn signal_group(pgid: u32, signal: StopSignal) -> io::Result<()> {
    let pgid = to_pid(pgid)?;
    // SAFETY: kill(2) has no memory-safety preconditions; a negative pid
    // addresses the process group.
    let rc = unsafe { libc::kill(-pgid, signal.as_raw()) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn signal_process(pid: u32, signal: StopSignal) -> io::Result<()> {
    let pid = to_pid(pid)?;
    // SAFETY: as above, targeting a single pid.
    let rc = unsafe { libc::kill(pid, signal.as_raw()) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn to_pid(raw: u32) -> io::Result<libc::pid_t> {
    match libc::pid_t::try_from(raw) {
        // 0 and 1 would address our own group or init.
        Ok(pid) if pid > 1 => Ok(pid),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to signal pid {raw}"),
        )),
    }
}

#[cfg(not(unix))]
fn signal_group(_pgid: u32, _signal: StopSignal) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process groups are not supported on this platform",
    ))
}

#[cfg(not(unix))]
fn signal_process(_pid: u32, _signal: StopSignal) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signals are not supported on this platform",
    ))
}
