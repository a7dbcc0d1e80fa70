//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let parsed = config.logging.level.parse::<Level>();
    writer::init(
        parsed.clone().unwrap_or(Level::Info),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )?;
    if let Err(e) = parsed {
        log_warning(&format!("{e}, falling back to 'info'"));
    }
    Ok(())
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// The two lines printed once the listener is bound.
///
/// Wildcard and loopback binds are shown as `localhost` so the URL can be
/// opened directly.
fn startup_banner(addr: &SocketAddr) -> [String; 2] {
    let host = if addr.ip().is_unspecified() || addr.ip().is_loopback() {
        "localhost".to_string()
    } else {
        match addr {
            SocketAddr::V4(v4) => v4.ip().to_string(),
            SocketAddr::V6(v6) => format!("[{}]", v6.ip()),
        }
    };
    [
        format!("Serving at http://{host}:{}", addr.port()),
        "Press Ctrl+C to stop".to_string(),
    ]
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    for line in startup_banner(addr) {
        write(Level::Info, &line);
    }
    write(Level::Debug, &format!("[CONFIG] Bound to {addr}"));
    write(Level::Debug, &format!("[CONFIG] Served root: {}", root.display()));
    write(
        Level::Debug,
        &format!(
            "[CONFIG] Directory listing: {}",
            if config.http.directory_listing { "on" } else { "off" }
        ),
    );
    if let Some(workers) = config.server.workers {
        write(Level::Debug, &format!("[CONFIG] Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write(Level::Debug, &format!("[CONFIG] Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Debug, &format!("[CONFIG] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Debug, &format!("[CONFIG] Error log: {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write(Level::Debug, &format!("[Connection] Closed with error: {err}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

/// Fatal startup failures always reach stderr, even before `init()`
pub fn log_fatal(message: &str) {
    eprintln!("[FATAL] {message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown_started(active: usize) {
    write(
        Level::Info,
        &format!("\nShutting down, waiting for {active} active connection(s)"),
    );
}

pub fn log_shutdown_complete() {
    write(Level::Info, "Server stopped");
}
