//! Request entry point
//!
//! Validates the method, hands the request to the static file responder,
//! renders errors, and stamps the fixed header set onto every response.

use hyper::header::{CONTENT_LENGTH, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Owned view of the parts of a request the responder needs
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    /// Raw (percent-encoded) path
    pub path: String,
    pub query: Option<String>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        Self {
            method: req.method().to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            is_head: req.method() == Method::HEAD,
            if_modified_since: header_string(req, IF_MODIFIED_SINCE),
            has_if_none_match: req.headers().contains_key(IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Never fails: every error becomes a status response carrying the same
/// fixed headers as a successful one.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, &ctx, peer_addr));
    drop(req);

    let mut response = match respond(&ctx, &state).await {
        Ok(response) => response,
        Err(err) => {
            log_serve_error(&ctx, &err);
            http::build_error_response(&err, ctx.is_head)
        }
    };

    http::apply_fixed_headers(response.headers_mut());
    http::apply_server_header(response.headers_mut(), &state.config.http.server_name);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = sent_body_len(&response, ctx.is_head);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn respond(
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Response<ResponseBody>, ServeError> {
    check_http_method(&ctx.method)?;
    static_files::serve(ctx, state).await
}

/// Only GET and HEAD are served
fn check_http_method(method: &str) -> Result<(), ServeError> {
    match method {
        "GET" | "HEAD" => Ok(()),
        other => Err(ServeError::MethodNotAllowed(other.to_string())),
    }
}

fn log_serve_error(ctx: &RequestContext, err: &ServeError) {
    match err {
        // Missing files are routine
        ServeError::NotFound => {}
        ServeError::Internal(source) => {
            logger::log_error(&format!("{} {}: {source}", ctx.method, ctx.path));
        }
        other => logger::log_warning(&format!("{} {}: {other}", ctx.method, ctx.path)),
    }
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_entry<B>(req: &Request<B>, ctx: &RequestContext, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        ctx.method.clone(),
        ctx.path.clone(),
    );
    entry.query.clone_from(&ctx.query);
    entry.http_version = version_string(req.version()).to_string();
    entry.referer = header_string(req, REFERER);
    entry.user_agent = header_string(req, USER_AGENT);
    entry
}

const fn version_string(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Body size actually written, `None` when nothing follows the head
fn sent_body_len(response: &Response<ResponseBody>, is_head: bool) -> Option<u64> {
    if is_head || response.status() == StatusCode::NOT_MODIFIED {
        return None;
    }
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
