#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kaname::catalog::{Catalog, CommandDefinition};
use kaname::engine::Engine;
use kaname::exec::{Interpreters, RunCompletion, StreamEvent, SupervisedRun};
use kaname::fs::mock::MockFileSystem;
use kaname::secrets::{SecretStore, SecretTable};

pub use kaname_test_utils::builders::{CommandBuilder, ParamBuilder};
pub use kaname_test_utils::scripts::ScriptDir;
pub use kaname_test_utils::{init_tracing, wait_until, with_timeout};

pub const CATALOG_PATH: &str = "/mock/commands.json";
pub const SECRETS_PATH: &str = "/mock/.env";

/// Engine over an in-memory catalog and secret table, running real bash.
pub fn engine_with(commands: Vec<CommandDefinition>, secrets: SecretTable) -> Arc<Engine> {
    engine_with_grace(commands, secrets, Duration::from_secs(5))
}

pub fn engine_with_grace(
    commands: Vec<CommandDefinition>,
    secrets: SecretTable,
    grace: Duration,
) -> Arc<Engine> {
    let fs = Arc::new(MockFileSystem::new());
    let catalog = Catalog::from_definitions(fs.clone(), CATALOG_PATH, commands);
    let secrets = SecretStore::with_table(fs, SECRETS_PATH, secrets);
    Arc::new(Engine::new(
        Arc::new(catalog),
        Arc::new(secrets),
        Interpreters::new("/bin/bash", "/nonexistent/venv"),
        grace,
    ))
}

/// Drain a run to the end and return every event plus how it finished.
pub async fn drain(run: SupervisedRun) -> (Vec<StreamEvent>, RunCompletion) {
    let SupervisedRun { mut events, task, .. } = run;
    let mut out = Vec::new();
    while let Some(ev) = events.recv().await {
        out.push(ev);
    }
    let completion = task.await.expect("supervisor task panicked");
    (out, completion)
}

/// Receive events until one with `data == line` shows up.
pub async fn recv_until(run: &mut SupervisedRun, line: &str) -> Vec<StreamEvent> {
    let mut seen = Vec::new();
    while let Some(ev) = run.events.recv().await {
        let done = ev.data == line;
        seen.push(ev);
        if done {
            return seen;
        }
    }
    panic!("stream closed before {line:?}; saw {seen:?}");
}

/// Whether a process with this pid still exists (zombies count as gone
/// only once reaped).
#[cfg(unix)]
pub fn process_exists(pid: i32) -> bool {
    // SAFETY: signal 0 performs only the existence/permission check.
    unsafe { libc::kill(pid, 0) == 0 }
}
