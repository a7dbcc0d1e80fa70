// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical served root; every resolved path must stay beneath it
    pub root: PathBuf,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self {
            config,
            root,
            active_connections: AtomicUsize::new(0),
        }
    }
}
