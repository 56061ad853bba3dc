// src/catalog/mod.rs

//! In-memory command catalog.
//!
//! Readers clone an `Arc` of the current snapshot under a read lock; a reload
//! parses the whole source first and then swaps the snapshot under the write
//! lock. A lookup therefore sees either the old catalog or the new one.

pub mod loader;
pub mod model;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info};

use crate::errors::Result;
use crate::fs::FileSystem;

pub use loader::{load_definitions, parse_definitions};
pub use model::{CommandDefinition, ParameterSpec};

/// Immutable view of one loaded catalog version.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    commands: Vec<CommandDefinition>,
    by_id: HashMap<String, usize>,
}

impl CatalogSnapshot {
    pub fn new(commands: Vec<CommandDefinition>) -> Self {
        let by_id = commands
            .iter()
            .enumerate()
            .map(|(idx, cmd)| (cmd.id.clone(), idx))
            .collect();
        Self { commands, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&CommandDefinition> {
        self.by_id.get(id).map(|&idx| &self.commands[idx])
    }

    /// Definitions in source order.
    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }
}

/// The active command catalog plus the source it reloads from.
#[derive(Debug)]
pub struct Catalog {
    fs: Arc<dyn FileSystem>,
    source: PathBuf,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Catalog {
    /// Load the catalog from `source`. Failure here is fatal for startup.
    pub fn load(fs: Arc<dyn FileSystem>, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        info!(path = ?source, "loading command definitions");
        let commands = load_definitions(fs.as_ref(), &source)?;
        info!(count = commands.len(), "loaded command definitions");

        Ok(Self {
            fs,
            source,
            current: RwLock::new(Arc::new(CatalogSnapshot::new(commands))),
        })
    }

    /// Build a catalog from definitions already in memory.
    pub fn from_definitions(
        fs: Arc<dyn FileSystem>,
        source: impl Into<PathBuf>,
        commands: Vec<CommandDefinition>,
    ) -> Self {
        Self {
            fs,
            source: source.into(),
            current: RwLock::new(Arc::new(CatalogSnapshot::new(commands))),
        }
    }

    /// Current snapshot; stays valid even if a reload happens meanwhile.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn get(&self, id: &str) -> Option<CommandDefinition> {
        self.snapshot().get(id).cloned()
    }

    pub fn list(&self) -> Vec<CommandDefinition> {
        self.snapshot().commands().to_vec()
    }

    /// Re-read the source and swap it in.
    ///
    /// On failure the previously active catalog stays in place and the error
    /// is returned to the caller. Returns the number of loaded commands.
    pub fn reload(&self) -> Result<usize> {
        info!(path = ?self.source, "reloading command definitions");
        let commands = match load_definitions(self.fs.as_ref(), &self.source) {
            Ok(commands) => commands,
            Err(e) => {
                error!(path = ?self.source, error = %e, "catalog reload failed; keeping previous catalog");
                return Err(e);
            }
        };

        let count = commands.len();
        self.replace(commands);
        info!(count, "reloaded command definitions");
        Ok(count)
    }

    /// Atomically replace the active catalog.
    pub fn replace(&self, commands: Vec<CommandDefinition>) {
        let next = Arc::new(CatalogSnapshot::new(commands));
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}
