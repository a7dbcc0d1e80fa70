//! Static file serving module
//!
//! Resolves a request path inside the served root and answers with the
//! file, an index file, a directory listing, or a redirect.

use hyper::Response;
use percent_encoding::utf8_percent_encode;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::listing;
use crate::handler::path::translate_path;
use crate::handler::router::RequestContext;
use crate::http::{self, conditional, mime, ResponseBody};
use crate::logger;

/// Serve whatever the request path names under the served root
pub async fn serve(
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Response<ResponseBody>, ServeError> {
    let translated = translate_path(&state.root, &ctx.path)?;
    let target = confine(&state.root, &translated.fs_path, &ctx.path).await?;
    let metadata = fs::metadata(&target).await?;

    if metadata.is_dir() {
        // Relative links in the page only resolve against a slash-terminated URL
        if !translated.trailing_slash {
            let location = directory_location(&translated.url_path, ctx.query.as_deref());
            return Ok(http::build_redirect_response(&location));
        }

        if let Some(index) = find_index_file(state, &target).await {
            return serve_file(ctx, &index).await;
        }

        if !state.config.http.directory_listing {
            return Err(ServeError::NotFound);
        }

        let html = listing::render_directory(&target, &translated.url_path).await?;
        return Ok(http::build_html_response(html, ctx.is_head));
    }

    // A file can't be addressed as if it were a directory
    if translated.trailing_slash {
        return Err(ServeError::NotFound);
    }

    serve_file(ctx, &target).await
}

/// Open and stream a single regular file
async fn serve_file(
    ctx: &RequestContext,
    path: &Path,
) -> Result<Response<ResponseBody>, ServeError> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    let content_type = mime::content_type_for(path);
    let modified = metadata.modified().ok();
    let last_modified = modified.map(conditional::format_http_date);

    if let (Some(mtime), Some(date)) = (modified, last_modified.as_deref()) {
        if conditional::is_not_modified(
            mtime,
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
        ) {
            return Ok(http::build_304_response(date));
        }
    }

    Ok(http::build_file_response(
        file,
        metadata.len(),
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    ))
}

/// Resolve symlinks and make sure the result is still under the root
async fn confine(root: &Path, candidate: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    let canonical = fs::canonicalize(candidate).await?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return Err(ServeError::NotFound);
    }
    Ok(canonical)
}

/// First configured index file that exists as a regular file inside the root
async fn find_index_file(state: &AppState, dir: &Path) -> Option<PathBuf> {
    for name in &state.config.http.index_files {
        let candidate = dir.join(name);
        let Ok(canonical) = confine(&state.root, &candidate, name).await else {
            continue;
        };
        if fs::metadata(&canonical).await.is_ok_and(|m| m.is_file()) {
            return Some(canonical);
        }
    }
    None
}

/// Location for the slash-terminated form of a directory URL
///
/// Built from the normalised path, so the result always starts with a
/// single `/` and can't be read as a scheme-relative URL.
fn directory_location(url_path: &str, query: Option<&str>) -> String {
    let mut location = String::with_capacity(url_path.len() + 1);
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        location.push('/');
        location.extend(utf8_percent_encode(segment, listing::HREF_ENCODE));
    }
    location.push('/');
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_config, TempRoot};
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
    use hyper::StatusCode;

    fn ctx(path: &str) -> RequestContext {
        RequestContext {
            method: "GET".to_string(),
            path: path.to_string(),
            query: None,
            is_head: false,
            if_modified_since: None,
            has_if_none_match: false,
        }
    }

    fn state(root: &TempRoot) -> AppState {
        AppState::new(test_config(), root.path().to_path_buf())
    }

    async fn body_bytes(response: Response<ResponseBody>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_serves_file_bytes() {
        let root = TempRoot::new();
        let contents = b"console.log('hi');\n".to_vec();
        root.write("app.js", &contents);

        let response = serve(&ctx("/app.js"), &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
        assert_eq!(response.headers()[CONTENT_LENGTH], contents.len().to_string().as_str());
        assert!(response.headers().contains_key(LAST_MODIFIED));
        assert_eq!(body_bytes(response).await, contents);
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let root = TempRoot::new();
        root.write("index.html", "<h1>home</h1>");

        let response = serve(&ctx("/"), &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(body_bytes(response).await, b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_index_fallback_order() {
        let root = TempRoot::new();
        root.write("site/index.htm", "legacy");

        let response = serve(&ctx("/site/"), &state(&root)).await.unwrap();
        assert_eq!(body_bytes(response).await, b"legacy");
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let root = TempRoot::new();
        root.mkdir("docs");

        let mut request = ctx("/docs");
        request.query = Some("lang=en".to_string());
        let response = serve(&request, &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/docs/?lang=en");
    }

    #[tokio::test]
    async fn test_redirect_never_scheme_relative() {
        let root = TempRoot::new();
        root.mkdir("evil.example");

        for path in ["//evil.example", "///evil.example", "/./evil.example"] {
            let response = serve(&ctx(path), &state(&root)).await.unwrap();
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(response.headers()[LOCATION], "/evil.example/", "{path}");
        }
    }

    #[tokio::test]
    async fn test_redirect_location_is_encoded() {
        let root = TempRoot::new();
        root.mkdir("my docs");

        let response = serve(&ctx("/my%20docs"), &state(&root)).await.unwrap();
        assert_eq!(response.headers()[LOCATION], "/my%20docs/");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let root = TempRoot::new();
        root.write("docs/guide.md", "# guide");

        let response = serve(&ctx("/docs/"), &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Directory listing for /docs/"));
        assert!(html.contains("guide.md"));
    }

    #[tokio::test]
    async fn test_directory_listing_disabled() {
        let root = TempRoot::new();
        root.mkdir("docs");
        let mut state = state(&root);
        state.config.http.directory_listing = false;

        let result = serve(&ctx("/docs/"), &state).await;
        assert!(matches!(result, Err(ServeError::NotFound)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let root = TempRoot::new();
        let result = serve(&ctx("/nope.txt"), &state(&root)).await;
        assert!(matches!(result, Err(ServeError::NotFound)));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash() {
        let root = TempRoot::new();
        root.write("notes.txt", "x");
        let result = serve(&ctx("/notes.txt/"), &state(&root)).await;
        assert!(matches!(result, Err(ServeError::NotFound)));
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let root = TempRoot::new();
        root.write("style.css", "body {}");

        let mut request = ctx("/style.css");
        request.if_modified_since = Some("Fri, 31 Dec 9999 23:59:59 GMT".to_string());
        let response = serve(&request, &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(body_bytes(response).await.is_empty());

        request.if_modified_since = Some("Thu, 01 Jan 1970 00:00:00 GMT".to_string());
        let response = serve(&request, &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let root = TempRoot::new();
        root.write("data.json", "{\"a\":1}");

        let mut request = ctx("/data.json");
        request.is_head = true;
        let response = serve(&request, &state(&root)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[CONTENT_LENGTH], "7");
        assert!(body_bytes(response).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outside = TempRoot::new();
        outside.write("secret.txt", "top secret");
        let root = TempRoot::new();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.path().join("leak.txt"))
            .unwrap();

        let result = serve(&ctx("/leak.txt"), &state(&root)).await;
        assert!(matches!(result, Err(ServeError::NotFound)));
    }
}
