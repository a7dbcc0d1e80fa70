//! Request handler module
//!
//! Maps request paths onto the served root and builds the response: a file,
//! an index file, a directory listing, a redirect, or an error page.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
