//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! file-serving logic in `handler`.

pub mod body;
pub mod conditional;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use headers::{apply_fixed_headers, apply_server_header};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_redirect_response,
};
