//! Static file serving.
//!
//! Serves the stylesheet and any other assets under `ui.static_dir`. Missing
//! files fall through to a plain 404 rather than the status page.

use std::path::Path;

use tower_http::services::ServeDir;

/// Create the static file service rooted at `dir`.
pub fn create_static_service(dir: &str) -> ServeDir {
    if !Path::new(dir).is_dir() {
        tracing::warn!(dir = %dir, "Static directory does not exist, assets will 404");
    }
    ServeDir::new(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_serves_stylesheet() {
        let service = create_static_service(concat!(env!("CARGO_MANIFEST_DIR"), "/static"));
        let response = service
            .oneshot(Request::builder().uri("/css/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = create_static_service(dir.path().to_str().unwrap());
        let response = service
            .oneshot(Request::builder().uri("/missing.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
