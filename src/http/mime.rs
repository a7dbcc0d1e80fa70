//! MIME type detection module
//!
//! A small override table is consulted first; everything else goes through
//! `mime_guess`, falling back to `application/octet-stream`.

use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions whose content type is fixed regardless of the generic lookup
const OVERRIDES: [(&str, &str); 3] = [
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("css", "text/css"),
];

/// Get MIME Content-Type for a file path
///
/// # Examples
/// ```ignore
/// assert_eq!(content_type_for(Path::new("app.js")), "application/javascript");
/// assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let overridden = path.extension().and_then(|e| e.to_str()).and_then(|ext| {
        OVERRIDES
            .iter()
            .find_map(|&(known, content_type)| known.eq_ignore_ascii_case(ext).then_some(content_type))
    });
    if let Some(content_type) = overridden {
        return content_type;
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
