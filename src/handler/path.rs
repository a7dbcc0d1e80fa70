//! Request path translation
//!
//! Maps the path component of a request URI onto the served root. The
//! result is purely lexical; symlinks are checked later against the
//! canonical root once the target is known to exist.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use crate::error::ServeError;

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Location under the served root
    pub fs_path: PathBuf,
    /// Decoded, normalised URL path, for display
    pub url_path: String,
    /// Whether the request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a raw (percent-encoded) request path
///
/// Empty and `.` segments are dropped and `..` pops a segment. A `..` with
/// nothing left to pop would leave the root, so it is reported as not
/// found rather than clamped.
pub fn translate_path(root: &Path, raw_path: &str) -> Result<TranslatedPath, ServeError> {
    if !raw_path.starts_with('/') {
        return Err(ServeError::BadRequest("request target must be an absolute path"));
    }

    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| ServeError::BadRequest("path is not valid UTF-8"))?;

    if decoded.contains('\0') {
        return Err(ServeError::BadRequest("path contains a NUL byte"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::NotFound);
                }
            }
            // A backslash is a separator on some platforms; refuse it everywhere
            s if s.contains('\\') => return Err(ServeError::NotFound),
            s => segments.push(s),
        }
    }

    let trailing_slash = raw_path.ends_with('/');
    let mut url_path = format!("/{}", segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        url_path.push('/');
    }

    let fs_path = segments
        .iter()
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment));

    Ok(TranslatedPath {
        fs_path,
        url_path,
        trailing_slash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/www")
    }

    #[test]
    fn test_root_path() {
        let t = translate_path(&root(), "/").unwrap();
        assert_eq!(t.fs_path, root());
        assert_eq!(t.url_path, "/");
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_nested_file() {
        let t = translate_path(&root(), "/assets/js/app.js").unwrap();
        assert_eq!(t.fs_path, root().join("assets").join("js").join("app.js"));
        assert_eq!(t.url_path, "/assets/js/app.js");
        assert!(!t.trailing_slash);
    }

    #[test]
    fn test_percent_decoding() {
        let t = translate_path(&root(), "/my%20docs/r%C3%A9sum%C3%A9.txt").unwrap();
        assert_eq!(t.fs_path, root().join("my docs").join("résumé.txt"));
    }

    #[test]
    fn test_dot_segments_normalised() {
        let t = translate_path(&root(), "/a/./b/../c//d/").unwrap();
        assert_eq!(t.fs_path, root().join("a").join("c").join("d"));
        assert_eq!(t.url_path, "/a/c/d/");
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_traversal_rejected() {
        for raw in [
            "/../../etc/passwd",
            "/a/../../etc/passwd",
            "/%2e%2e/etc/passwd",
            "/..%2f..%2fetc%2fpasswd",
        ] {
            assert!(
                matches!(translate_path(&root(), raw), Err(ServeError::NotFound)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_backslash_rejected() {
        assert!(matches!(
            translate_path(&root(), "/..%5c..%5cwindows"),
            Err(ServeError::NotFound)
        ));
    }

    #[test]
    fn test_malformed_paths() {
        assert!(matches!(
            translate_path(&root(), "*"),
            Err(ServeError::BadRequest(_))
        ));
        assert!(matches!(
            translate_path(&root(), "/%ff%fe"),
            Err(ServeError::BadRequest(_))
        ));
        assert!(matches!(
            translate_path(&root(), "/file%00.txt"),
            Err(ServeError::BadRequest(_))
        ));
    }
}
