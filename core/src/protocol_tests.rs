//! Unit tests for the app:// protocol (path normalization, serve, MIME).

#[cfg(test)]
mod tests {
    use crate::config::UI;
    use crate::protocol::{mime_from_path, normalize_path, respond, serve, ServeResult, INDEX_PATH};

    #[test]
    fn normalize_path_default_index() {
        assert_eq!(normalize_path("/"), Some(INDEX_PATH));
        assert_eq!(normalize_path(""), Some(INDEX_PATH));
        assert_eq!(normalize_path("///"), Some(INDEX_PATH));
        assert_eq!(normalize_path("/app.js"), Some("app.js"));
    }

    #[test]
    fn normalize_path_rejects_traversal() {
        assert_eq!(normalize_path("/.."), None);
        assert_eq!(normalize_path("/a/../b"), None);
        assert_eq!(normalize_path("/.. /index.html"), None);
    }

    #[test]
    fn serve_not_found_for_traversal() {
        assert!(matches!(serve(&UI, "/../etc/passwd"), ServeResult::NotFound));
    }

    #[test]
    fn serve_not_found_for_missing_file() {
        assert!(matches!(serve(&UI, "/nonexistent.foo"), ServeResult::NotFound));
    }

    #[test]
    fn serve_index() {
        match serve(&UI, "/") {
            ServeResult::Found { mime_type, body } => {
                assert_eq!(mime_type, "text/html");
                assert!(!body.is_empty());
            }
            ServeResult::NotFound => panic!("ui/dist/index.html is embedded"),
        }
    }

    #[test]
    fn respond_sets_headers() {
        let ok = respond(&UI, "/app.js");
        assert_eq!(ok.status(), 200);
        assert_eq!(ok.headers()["Content-Type"], "application/javascript");
        assert!(ok.headers().contains_key("Content-Security-Policy"));

        let missing = respond(&UI, "/nope.css");
        assert_eq!(missing.status(), 404);
    }

    #[test]
    fn mime_from_path_known_extensions() {
        assert_eq!(mime_from_path("a.html"), "text/html");
        assert_eq!(mime_from_path("b.js"), "application/javascript");
        assert_eq!(mime_from_path("c.css"), "text/css");
        assert_eq!(mime_from_path("d.png"), "image/png");
        assert_eq!(mime_from_path("e.woff2"), "font/woff2");
        assert_eq!(mime_from_path("f.unknown"), "application/octet-stream");
    }
}
