//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Resolves the request path
//! against the route table and dispatches to the page or asset handler.
//!
//! Matching order: exact page routes first, then asset mounts by prefix
//! (with the prefix stripped), then the fallback page for everything else,
//! including `/`. No method gating and no request validation happen here;
//! any method reaches the handlers, HEAD just suppresses the body.

use crate::config::{AppState, AssetMount, RoutesConfig};
use crate::handler::{pages, static_files};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Resolved route target for a request path
#[derive(Debug, PartialEq, Eq)]
pub enum RouteTarget<'a> {
    /// Exact page route: the named file, served verbatim
    Page(&'a str),
    /// Asset mount: remainder of the path after the stripped prefix
    Asset { mount: &'a AssetMount, rel: &'a str },
    /// Catch-all: the fallback page file
    Fallback(&'a str),
}

/// Resolve a request path against the route table
///
/// Every path resolves to exactly one target. A mount route matches the
/// bare prefix (`/wasm`) and anything under it (`/wasm/...`), but not
/// sibling paths that merely share the prefix characters (`/wasmx`).
pub fn resolve_route<'a>(path: &'a str, routes: &'a RoutesConfig) -> RouteTarget<'a> {
    if let Some(file) = routes.pages.get(path) {
        return RouteTarget::Page(file);
    }

    for mount in &routes.assets {
        let prefix = mount.route.trim_end_matches('/');
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() {
                return RouteTarget::Asset { mount, rel: "" };
            }
            if let Some(rel) = rest.strip_prefix('/') {
                return RouteTarget::Asset { mount, rel };
            }
        }
    }

    RouteTarget::Fallback(&routes.fallback_file)
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    let is_head = method == Method::HEAD;
    let version = version_str(req.version());

    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let ctx = RequestContext {
        path,
        is_head,
        if_none_match: header_string(&req, "if-none-match"),
        range_header: header_string(&req, "range"),
    };

    let routes = state.routes();
    let response = match resolve_route(path, routes) {
        RouteTarget::Page(file) => pages::serve_page(&ctx, file).await,
        RouteTarget::Asset { mount, rel } => {
            static_files::serve_asset(&ctx, &mount.dir, rel, &routes.index_files).await
        }
        RouteTarget::Fallback(file) => pages::serve_page(&ctx, file).await,
    };

    if state.access_log() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path.to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Extract a request header as an owned string
fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Body size as advertised by the response (0 for 304 and friends)
fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn version_str(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
