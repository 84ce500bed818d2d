// app:// protocol: serve from embedded UI, CSP, no external URLs.

use include_dir::Dir;
use std::borrow::Cow;

/// CSP for app://. Slide images may come from anywhere; scripts and fetches may not.
pub const CSP: &str =
    "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data: https: http:; connect-src 'none';";

/// Path served for `/` and empty paths.
pub const INDEX_PATH: &str = "index.html";

/// Outcome of looking up a request path in the embedded UI.
pub enum ServeResult {
    Found {
        body: Cow<'static, [u8]>,
        mime_type: &'static str,
    },
    NotFound,
}

/// Content type by file extension.
#[must_use]
pub fn mime_from_path(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Maps a URI path to a path inside the UI tree. `None` for traversal attempts.
#[must_use]
pub fn normalize_path(uri_path: &str) -> Option<&str> {
    let path = uri_path.trim_matches('/');
    if path.split('/').any(|seg| seg.trim() == "..") {
        return None;
    }
    if path.is_empty() {
        Some(INDEX_PATH)
    } else {
        Some(path)
    }
}

/// Serve one request from the embedded UI dir. No filesystem access.
pub fn serve(ui: &'static Dir<'static>, uri_path: &str) -> ServeResult {
    let Some(path) = normalize_path(uri_path) else {
        return ServeResult::NotFound;
    };
    match ui.get_file(path) {
        Some(file) => ServeResult::Found {
            body: Cow::Borrowed(file.contents()),
            mime_type: mime_from_path(path),
        },
        None => ServeResult::NotFound,
    }
}

/// Builds the full HTTP response for an app:// request.
pub fn respond(ui: &'static Dir<'static>, uri_path: &str) -> http::Response<Cow<'static, [u8]>> {
    let (status, body, mime_type) = match serve(ui, uri_path) {
        ServeResult::Found { body, mime_type } => (200, body, mime_type),
        ServeResult::NotFound => (404, Cow::Borrowed(b"Not Found".as_slice()), "text/plain"),
    };
    http::Response::builder()
        .status(status)
        .header("Content-Type", mime_type)
        .header("Content-Security-Policy", CSP)
        .header("X-Content-Type-Options", "nosniff")
        .body(body)
        .unwrap_or_else(|e| {
            log::error!("Protocol response build failed: {}", e);
            let mut fallback = http::Response::new(Cow::Borrowed(b"Internal Server Error".as_slice()));
            *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
