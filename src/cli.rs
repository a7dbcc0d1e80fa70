//! Command-line interface
//!
//! Every flag is optional; without flags the server behaves exactly like the
//! built-in defaults (port 8000 on all interfaces, current directory).

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "static-dev-server", version)]
#[command(about = "Serve a directory over HTTP with CORS and no-cache headers", long_about = None)]
pub struct Cli {
    /// TOML config file path (missing file is ignored)
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Respond 404 instead of listing directories without an index file
    #[arg(long)]
    pub no_listing: bool,

    /// Number of runtime worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,
}
