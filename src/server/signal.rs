// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown request shared between the signal task and the server loop
pub struct SignalHandler {
    shutdown: Notify,
    shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Request shutdown; wakes every current and future `wait()`
    pub fn trigger(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        // Register before checking the flag so a trigger in between is not lost
        let notified = self.shutdown.notified();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// Spawns a background task that turns SIGINT or SIGTERM into a shutdown
/// request. A handler that fails to register is logged and skipped.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let sigterm = signal(SignalKind::terminate());
        let sigint = signal(SignalKind::interrupt());

        let (mut sigterm, mut sigint) = match (sigterm, sigint) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => logger::log_info("\n[SIGNAL] SIGTERM received"),
            _ = sigint.recv() => logger::log_info("\n[SIGNAL] SIGINT received (Ctrl+C)"),
        }
        handler.trigger();
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_info("\n[SIGNAL] Ctrl+C received");
                handler.trigger();
            }
            Err(e) => logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
}
