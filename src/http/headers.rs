//! Fixed response header set
//!
//! Every response leaving the server, success or error, carries these
//! headers. They are applied after the response is built so they win over
//! anything a builder set for the same name.

use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, PRAGMA, SERVER,
};

/// CORS and no-cache headers, in the order they are written
pub const FIXED_HEADERS: [(HeaderName, &str); 5] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET"),
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// Insert the fixed header set, replacing any existing values
pub fn apply_fixed_headers(headers: &mut HeaderMap) {
    for (name, value) in FIXED_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Set the `Server` header unless a builder already chose one
pub fn apply_server_header(headers: &mut HeaderMap, server_name: &str) {
    if headers.contains_key(SERVER) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fixed_headers() {
        let mut headers = HeaderMap::new();
        apply_fixed_headers(&mut headers);
        assert_eq!(headers.len(), 5);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET");
        assert_eq!(
            headers["cache-control"],
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(headers["pragma"], "no-cache");
        assert_eq!(headers["expires"], "0");
    }

    #[test]
    fn test_fixed_headers_override_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        apply_fixed_headers(&mut headers);
        assert_eq!(headers.get_all(CACHE_CONTROL).iter().count(), 1);
        assert_eq!(
            headers[CACHE_CONTROL],
            "no-cache, no-store, must-revalidate"
        );
    }

    #[test]
    fn test_server_header() {
        let mut headers = HeaderMap::new();
        apply_server_header(&mut headers, "static-dev-server/0.1.0");
        assert_eq!(headers[SERVER], "static-dev-server/0.1.0");

        // Invalid header values are skipped rather than panicking
        let mut headers = HeaderMap::new();
        apply_server_header(&mut headers, "bad\nname");
        assert!(!headers.contains_key(SERVER));
    }
}
