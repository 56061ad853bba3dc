// src/exec/outcome.rs

use std::io;
use std::process::ExitStatus;

/// How a run ended, in classification priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Terminated by the interrupt the cancel path sends.
    Cancelled,
    /// Non-zero exit or any other signal.
    Failed(String),
    /// Waiting on the child itself failed.
    WaitFailed(String),
    Succeeded,
}

impl RunOutcome {
    pub fn classify(wait: io::Result<ExitStatus>) -> Self {
        match wait {
            Ok(status) => Self::from_status(status),
            Err(e) => RunOutcome::WaitFailed(e.to_string()),
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        if interrupted(&status) {
            RunOutcome::Cancelled
        } else if status.success() {
            RunOutcome::Succeeded
        } else {
            RunOutcome::Failed(status.to_string())
        }
    }

    /// Text of the terminal `system` event.
    pub fn message(&self) -> String {
        match self {
            RunOutcome::Succeeded => "SUCCESS: Command completed successfully.".to_string(),
            RunOutcome::Cancelled => "CANCELLED: Command was cancelled by user.".to_string(),
            RunOutcome::Failed(reason) => format!("FAIL: Command finished with error: {reason}"),
            RunOutcome::WaitFailed(reason) => {
                format!("FAIL: Command finished with non-exit error: {reason}")
            }
        }
    }
}

#[cfg(unix)]
fn interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    use super::signal::{StopSignal, is_signal};

    status
        .signal()
        .is_some_and(|raw| is_signal(raw, StopSignal::Interrupt))
}

#[cfg(not(unix))]
fn interrupted(_status: &ExitStatus) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    // Raw wait(2) statuses: exit code in the high byte, signal in the low bits.
    fn exited(code: i32) -> ExitStatus {
        ExitStatus::from_raw(code << 8)
    }

    fn signalled(sig: i32) -> ExitStatus {
        ExitStatus::from_raw(sig)
    }

    #[test]
    fn zero_exit_succeeds() {
        assert_eq!(RunOutcome::from_status(exited(0)), RunOutcome::Succeeded);
    }

    #[test]
    fn nonzero_exit_fails_with_status_text() {
        let outcome = RunOutcome::from_status(exited(3));
        assert!(matches!(&outcome, RunOutcome::Failed(reason) if reason.contains('3')));
        assert!(outcome.message().starts_with("FAIL: Command finished with error: "));
    }

    #[test]
    fn sigint_is_cancelled() {
        let outcome = RunOutcome::from_status(signalled(libc::SIGINT));
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(outcome.message(), "CANCELLED: Command was cancelled by user.");
    }

    #[test]
    fn other_signals_fail() {
        assert!(matches!(
            RunOutcome::from_status(signalled(libc::SIGKILL)),
            RunOutcome::Failed(_)
        ));
        assert!(matches!(
            RunOutcome::from_status(signalled(libc::SIGTERM)),
            RunOutcome::Failed(_)
        ));
    }

    #[test]
    fn wait_error_is_non_exit_failure() {
        let outcome = RunOutcome::classify(Err(io::Error::other("boom")));
        assert_eq!(
            outcome.message(),
            "FAIL: Command finished with non-exit error: boom"
        );
    }
}
