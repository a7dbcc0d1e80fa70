// Configuration module entry point
// Layers built-in defaults, an optional config file, environment variables
// and command-line flags into one immutable `Config`

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use config::{ConfigError, FileFormat};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Environment variable prefix, e.g. `STATIC_SERVER__SERVER__PORT=9000`
const ENV_PREFIX: &str = "STATIC_SERVER";

impl Config {
    /// Load configuration with command-line flags taking precedence over
    /// the config file and environment
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = base_builder(&cli.config)?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option(
                "server.root",
                cli.root
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option(
                "server.workers",
                cli.workers.and_then(|w| i64::try_from(w).ok()),
            )?;

        if cli.no_listing {
            builder = builder.set_override("http.directory_listing", false)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from the TOML file at `config_path`
    /// Missing files are not an error; defaults apply
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        base_builder(config_path)?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|source| StartupError::Address {
                addr: format!("{}:{}", self.server.host, self.server.port),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Canonical path of the served root, which must be an existing directory
    pub fn resolve_root(&self) -> Result<PathBuf, StartupError> {
        let root_error = |source: std::io::Error| StartupError::Root {
            path: self.server.root.clone(),
            source,
        };
        let root = std::fs::canonicalize(&self.server.root).map_err(root_error)?;
        if !root.is_dir() {
            return Err(root_error(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "not a directory",
            )));
        }
        Ok(root)
    }
}

fn base_builder(config_path: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        // Only TOML is read, so a project's own `config.json` is never picked up
        .add_source(config::File::new(config_path, FileFormat::Toml).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.root", ".")?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("http.server_name", concat!("static-dev-server/", env!("CARGO_PKG_VERSION")))?
        .set_default("http.directory_listing", true)?
        .set_default("performance.keep_alive", true)?
        .set_default("performance.shutdown_timeout", 5)
}
