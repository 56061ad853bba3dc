// src/secrets/mod.rs

//! Secret store backing `$NAME` substitution in parameter values.
//!
//! Same snapshot-swap pattern as the catalog: argument building takes an
//! `Arc<SecretTable>` under the read lock, reloads replace it wholesale.

pub mod parser;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info};

use crate::errors::{KanameError, Result};
use crate::fs::FileSystem;

pub use parser::parse_dotenv;

/// Immutable name → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretTable {
    vars: HashMap<String, String>,
}

impl SecretTable {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The active secret table plus the file it is loaded from.
#[derive(Debug)]
pub struct SecretStore {
    fs: Arc<dyn FileSystem>,
    source: PathBuf,
    current: RwLock<Arc<SecretTable>>,
}

impl SecretStore {
    /// A store with an empty table; call [`SecretStore::reload`] to populate.
    pub fn new(fs: Arc<dyn FileSystem>, source: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            source: source.into(),
            current: RwLock::new(Arc::new(SecretTable::default())),
        }
    }

    pub fn with_table(fs: Arc<dyn FileSystem>, source: impl Into<PathBuf>, table: SecretTable) -> Self {
        Self {
            fs,
            source: source.into(),
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<SecretTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn lookup(&self, name: &str) -> Option<String> {
        self.snapshot().get(name).map(str::to_string)
    }

    /// Re-read the secrets file and swap the table in.
    ///
    /// A missing file is created empty. On a read failure the previous table
    /// stays active. Returns the number of loaded variables.
    pub fn reload(&self) -> Result<usize> {
        let table = match self.read_table() {
            Ok(table) => table,
            Err(e) => {
                error!(path = ?self.source, error = %e, "secrets reload failed; keeping previous table");
                return Err(e);
            }
        };

        let count = table.len();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(table);
        info!(count, "loaded environment variable(s)");
        Ok(count)
    }

    /// The secrets file verbatim; empty if it does not exist.
    pub fn raw_contents(&self) -> Result<String> {
        if !self.fs.exists(&self.source) {
            return Ok(String::new());
        }
        self.fs
            .read_to_string(&self.source)
            .map_err(|e| KanameError::ConfigError(format!("failed to read secrets file: {e:#}")))
    }

    /// Overwrite the secrets file and reload it.
    ///
    /// A failed write is returned; a failed reload after a successful write is
    /// only logged, matching what the caller can act on.
    pub fn replace_contents(&self, contents: &[u8]) -> Result<()> {
        self.fs
            .write(&self.source, contents)
            .map_err(|e| KanameError::ConfigError(format!("failed to write secrets file: {e:#}")))?;

        if let Err(e) = self.reload() {
            error!(error = %e, "failed to reload env vars after update");
        }
        Ok(())
    }

    fn read_table(&self) -> Result<SecretTable> {
        if !self.fs.exists(&self.source) {
            info!(path = ?self.source, "secrets file not found; creating an empty file");
            self.fs
                .write(&self.source, b"")
                .map_err(|e| KanameError::ConfigError(format!("failed to create secrets file: {e:#}")))?;
            return Ok(SecretTable::default());
        }

        let contents = self
            .fs
            .read_to_string(&self.source)
            .map_err(|e| KanameError::ConfigError(format!("error reading secrets file: {e:#}")))?;
        Ok(SecretTable::new(parse_dotenv(&contents)))
    }
}
