//! Directory listing
//!
//! Renders an HTML index for directories that have no index file.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;
use std::path::Path;
use tokio::fs;

use crate::error::ServeError;
use crate::http::response::escape_html;

/// Characters left unescaped in listing hrefs (RFC 3986 unreserved)
pub const HREF_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or a symlink pointing at one
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read a directory and render its listing
pub async fn render_directory(dir: &Path, url_path: &str) -> Result<String, ServeError> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Follows symlinks; a dangling link lists as a plain entry
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(render_listing(url_path, &entries))
}

/// Render listing HTML for already-sorted entries
pub fn render_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(url_path));
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <hr>\n\
         <ul>\n"
    );

    for entry in entries {
        let mut href = utf8_percent_encode(&entry.name, HREF_ENCODE).to_string();
        let mut display = escape_html(&entry.name);
        if entry.is_dir {
            href.push('/');
            display.push('/');
        }
        if entry.is_symlink {
            display.push('@');
        }
        let _ = writeln!(html, "<li><a href=\"{href}\">{display}</a></li>");
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
