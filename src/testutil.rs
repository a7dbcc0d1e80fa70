//! Fixture helpers shared by unit tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory standing in for the served root, removed on drop
pub struct TempRoot {
    _dir: TempDir,
    path: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        // Canonical so prefix checks against the served root hold on
        // platforms where the temp dir sits behind a symlink
        let path = dir.path().canonicalize().unwrap();
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file relative to the root, creating parent directories
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&target, contents).unwrap();
        target
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let target = self.path.join(relative);
        std::fs::create_dir_all(&target).unwrap();
        target
    }
}

/// Default configuration with access logging off to keep test output quiet
pub fn test_config() -> crate::config::Config {
    let mut cfg = crate::config::Config::load_from("definitely-not-a-config-file")
        .unwrap();
    cfg.logging.access_log = false;
    cfg
}
