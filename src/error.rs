//! Error types
//!
//! `ServeError` covers everything that can go wrong while answering a single
//! request; each variant maps to one HTTP status. `StartupError` covers the
//! fatal failures that stop the process before it starts serving.

use hyper::StatusCode;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Per-request failure, rendered as an HTTP error response
#[derive(Debug, Error)]
pub enum ServeError {
    /// Missing file, traversal outside the root, or listing disabled
    #[error("File not found")]
    NotFound,

    /// Permission denied while opening a file or directory
    #[error("Access denied")]
    Forbidden,

    /// Request target could not be interpreted
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Unexpected I/O failure
    #[error("Internal error: {0}")]
    Internal(io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message for the error page
    pub fn message(&self) -> String {
        match self {
            // Don't leak filesystem details to the client
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::Internal(err),
        }
    }
}

/// Fatal error raised before the server starts accepting connections
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("served root '{path}' is not usable: {source}")]
    Root { path: String, source: io::Error },

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to open log file: {0}")]
    Log(io::Error),

    #[error("failed to build async runtime: {0}")]
    Runtime(io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServeError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ServeError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServeError::BadRequest("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServeError::MethodNotAllowed("POST".to_string()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_io_error_mapping() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(ServeError::from(not_found), ServeError::NotFound));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(ServeError::from(denied), ServeError::Forbidden));

        let other = io::Error::other("disk on fire");
        let err = ServeError::from(other);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
