// src/exec/mod.rs

//! Process execution and streaming.
//!
//! - [`args`] turns a command definition + request params into a command line.
//! - [`registry`] tracks live runs by run id, at most one per id.
//! - [`launcher`] claims the run id and spawns the child in its own process group.
//! - [`multiplex`] merges stdout and stderr into one line-event channel.
//! - [`supervisor`] drives a launched run to completion or disconnect.
//! - [`signal`] delivers interrupts to a run's process group.
//! - [`outcome`] classifies how a run ended.

pub mod args;
pub mod event;
pub mod launcher;
pub mod multiplex;
pub mod outcome;
pub mod registry;
pub mod signal;
pub mod supervisor;

pub use args::{Interpreters, Invocation, build_invocation, substitute_secret};
pub use event::StreamEvent;
pub use launcher::{LaunchedRun, Launcher};
pub use multiplex::spawn_multiplexer;
pub use outcome::RunOutcome;
pub use registry::{ProcessRegistry, RunGuard, RunHandle};
pub use signal::{Delivery, StopSignal, signal_run};
pub use supervisor::{RunCompletion, SupervisedRun, supervise};
