//! Page serving module
//!
//! Serves the named HTML pages (and the fallback page) verbatim from the
//! working directory. Pages are read fresh from disk on every request and
//! never cached.

use crate::handler::router::RequestContext;
use crate::http::{mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a page file verbatim
///
/// Always answers 200. A failed read is intentionally discarded: the
/// client gets an empty body with a success status, which is the behavior
/// the original server shipped with. Only the server-side log records the
/// failure.
pub async fn serve_page(ctx: &RequestContext<'_>, file_path: &str) -> Response<Full<Bytes>> {
    let path = Path::new(file_path);

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read page '{file_path}': {e} (serving empty body)"
            ));
            Vec::new()
        }
    };

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    response::build_page_response(content, content_type, ctx.is_head)
}
