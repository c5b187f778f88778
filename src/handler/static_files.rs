//! Static asset serving module
//!
//! The generic file-serving facility behind the asset mounts. Resolves a
//! prefix-stripped relative path under a mount directory with traversal
//! protection, then answers with MIME detection, ETag/304 and single-range
//! support. Missing assets are a 404, unlike page routes.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a static asset from a mount directory
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    dir: &str,
    rel: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_asset(dir, rel, index_files).await {
        Some((content, content_type)) => build_asset_response(&content, content_type, ctx),
        None => http::build_404_response(),
    }
}

/// Resolve and read an asset file under the mount directory
///
/// `rel` is the request path with the mount prefix already stripped.
/// Directory paths fall back to the configured index files. Any resolution
/// escaping the mount directory is rejected.
pub async fn load_asset(
    dir: &str,
    rel: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Strip anything that could walk upward before joining
    let clean_rel = rel.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(dir).join(&clean_rel);

    let dir_canonical = match Path::new(dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{dir}': {e}"
            ));
            return None;
        }
    };

    // Directory path: try index files
    if file_path.is_dir() || clean_rel.is_empty() || clean_rel.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            rel,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build asset response with `ETag` and Range support
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Client already has this version
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            response::build_cached_response(body, content_type, &etag, ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn setup_mount(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("asset-test-{}-{name}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("game.wasm"), b"\0asm....").unwrap();
        std::fs::write(dir.join("sub").join("glue.js"), b"export {}").unwrap();
        std::fs::write(dir.join("index.html"), b"<html>wasm index</html>").unwrap();
        dir
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    fn test_ctx() -> RequestContext<'static> {
        RequestContext {
            path: "/wasm/game.wasm",
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    #[tokio::test]
    async fn test_load_existing_asset() {
        let dir = setup_mount("load");
        let (content, content_type) =
            load_asset(dir.to_str().unwrap(), "game.wasm", &index_files())
                .await
                .expect("asset should load");
        assert_eq!(content, b"\0asm....");
        assert_eq!(content_type, "application/wasm");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_load_nested_asset() {
        let dir = setup_mount("nested");
        let (content, content_type) =
            load_asset(dir.to_str().unwrap(), "sub/glue.js", &index_files())
                .await
                .expect("asset should load");
        assert_eq!(content, b"export {}");
        assert_eq!(content_type, "application/javascript");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_asset_is_none() {
        let dir = setup_mount("missing");
        assert!(
            load_asset(dir.to_str().unwrap(), "no-such-file.wasm", &index_files())
                .await
                .is_none()
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_traversal_cannot_escape_mount() {
        let dir = setup_mount("traversal");
        let secret = dir.parent().unwrap().join("secret.txt");
        std::fs::write(&secret, b"top secret").unwrap();

        assert!(
            load_asset(dir.to_str().unwrap(), "../secret.txt", &index_files())
                .await
                .is_none()
        );
        assert!(
            load_asset(dir.to_str().unwrap(), "..%2Fsecret.txt", &index_files())
                .await
                .is_none()
        );

        std::fs::remove_file(&secret).ok();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_directory_path_serves_index_file() {
        let dir = setup_mount("index");
        let (content, content_type) = load_asset(dir.to_str().unwrap(), "", &index_files())
            .await
            .expect("index should load");
        assert_eq!(content, b"<html>wasm index</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_serve_asset_range_request() {
        let dir = setup_mount("range");
        let ctx = RequestContext {
            range_header: Some("bytes=0-3".to_string()),
            ..test_ctx()
        };
        let resp = serve_asset(&ctx, dir.to_str().unwrap(), "game.wasm", &index_files()).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(
            resp.headers().get("Content-Range").unwrap().to_str().unwrap(),
            "bytes 0-3/8"
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_serve_asset_conditional_304() {
        let dir = setup_mount("etag");
        let first = serve_asset(&test_ctx(), dir.to_str().unwrap(), "game.wasm", &index_files())
            .await;
        let etag = first
            .headers()
            .get("ETag")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let ctx = RequestContext {
            if_none_match: Some(etag),
            ..test_ctx()
        };
        let second = serve_asset(&ctx, dir.to_str().unwrap(), "game.wasm", &index_files()).await;
        assert_eq!(second.status(), 304);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_serve_missing_asset_is_404() {
        let dir = setup_mount("404");
        let resp = serve_asset(&test_ctx(), dir.to_str().unwrap(), "gone.wasm", &index_files())
            .await;
        assert_eq!(resp.status(), 404);
        std::fs::remove_dir_all(&dir).ok();
    }
}
