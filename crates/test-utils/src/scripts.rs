use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory of bash scripts for end-to-end run tests.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp script dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `body` as `<name>` and return its path as a string.
    pub fn script(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).expect("writing test script");
        path.to_string_lossy().into_owned()
    }

    /// Path for a file inside the dir that does not exist yet.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}
