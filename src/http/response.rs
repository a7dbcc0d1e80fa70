//! HTTP response building module
//!
//! Builders for every status the server produces. None of them add the fixed
//! header set; the router applies it once to whatever comes out.

use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};
use tokio::fs::File;

use super::body::{self, ResponseBody};
use crate::error::ServeError;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build 200 response streaming an open file
pub fn build_file_response(
    file: File,
    len: u64,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, len);

    if let Some(date) = last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    let body = if is_head { body::empty() } else { body::file(file) };

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            fallback(StatusCode::NOT_MODIFIED)
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build an error response with a small HTML page
pub fn build_error_response(err: &ServeError, is_head: bool) -> Response<ResponseBody> {
    let status = err.status();
    let page = error_page(status, &err.message());
    let content_length = page.len();

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length);

    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder = builder.header(ALLOW, "GET, HEAD");
    }

    let body = if is_head { body::empty() } else { body::full(page) };

    builder.body(body).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        fallback(status)
    })
}

fn error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{code} {reason}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{code} {reason}</h1>\n\
         <p>{}</p>\n\
         </body>\n\
         </html>\n",
        escape_html(message)
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn fallback(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(body::empty());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
