//! static-dev-server
//!
//! Serves a directory tree over HTTP/1.1. Every response carries permissive
//! CORS headers and headers that forbid caching, so a browser always sees
//! the current state of the files on disk.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

mod cli;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;
#[cfg(test)]
mod testutil;

use crate::cli::Cli;
use crate::config::{AppState, Config};
use crate::error::StartupError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), StartupError> {
    let cfg = Config::load(cli)?;
    logger::init(&cfg).map_err(StartupError::Log)?;

    // Build the Tokio runtime, honouring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    match cfg.server.workers {
        Some(0) => logger::log_warning("server.workers must be positive, using default"),
        Some(workers) => {
            runtime_builder.worker_threads(workers);
        }
        None => {}
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

/// Owns the listening socket for the lifetime of the server; it is closed
/// when the server loop returns after a shutdown signal
async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let root = cfg.resolve_root()?;
    let addr = cfg.get_socket_addr()?;
    let listener =
        server::create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;
    let bound = listener.local_addr().unwrap_or(addr);

    logger::log_server_start(&bound, &root, &cfg);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let state = Arc::new(AppState::new(cfg, root));
    server::start_server_loop(listener, state, async move { signals.wait().await }).await;

    logger::log_shutdown_complete();
    Ok(())
}
