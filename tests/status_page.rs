//! End-to-end tests of the status page routes.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`. Backends
//! are either in-process fakes or real axum servers on ephemeral ports, so no
//! external services are needed.
//!
//! Run with: cargo test --test status_page

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower::ServiceExt;

use zinad_status::backend::{BackendClient, BackendError, HelloResponse, HttpBackendClient};
use zinad_status::config::AppConfig;
use zinad_status::page::MountedPages;
use zinad_status::routes::create_router;
use zinad_status::state::AppState;
use zinad_status::templates::init_templates;

/// Test configuration; `render_wait_ms` decides whether `/` waits for settle.
fn test_config(render_wait_ms: u64) -> AppConfig {
    let root = env!("CARGO_MANIFEST_DIR");
    format!(
        r#"
        [http]
        host = "127.0.0.1"
        port = 0

        [backend]
        base_url = "http://127.0.0.1:9"
        request_timeout_seconds = 2
        connect_timeout_seconds = 1

        [ui]
        render_wait_ms = {render_wait_ms}
        templates_dir = "{root}/templates"
        static_dir = "{root}/static"
        "#
    )
    .parse()
    .unwrap()
}

fn app_with(client: Arc<dyn BackendClient>, render_wait_ms: u64) -> Router {
    let config = test_config(render_wait_ms);
    let tera = init_templates(&config.ui.templates_dir).unwrap();
    let pages = MountedPages::new(client, &config.pages);
    create_router(AppState::new(config, tera, pages))
}

async fn get_path(app: &Router, path: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Pull the mounted page id out of the loading page's refresh target.
fn page_id_from(html: &str) -> String {
    let start = html.find("url=/page/").expect("refresh target") + "url=/page/".len();
    html[start..start + 36].to_string()
}

/// Fake backend answering one call per released permit.
struct GatedBackend {
    outcome: Result<HelloResponse, BackendError>,
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedBackend {
    fn new(outcome: Result<HelloResponse, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    fn immediate(outcome: Result<HelloResponse, BackendError>) -> Arc<Self> {
        let backend = Self::new(outcome);
        backend.gate.add_permits(1000);
        backend
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for GatedBackend {
    async fn hello(&self) -> Result<HelloResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await.unwrap().forget();
        self.outcome.clone()
    }
}

fn greeting(message: &str) -> Result<HelloResponse, BackendError> {
    HelloResponse::from_slice(serde_json::json!({ "message": message }).to_string().as_bytes())
}

#[tokio::test]
async fn test_loading_before_settle() {
    let backend = GatedBackend::new(greeting("ok"));
    let app = app_with(backend.clone(), 0);

    let response = get_path(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert!(response.headers().contains_key("x-request-id"));

    let html = body_text(response).await;
    assert!(html.contains("Loading..."));
    assert!(!html.contains("class=\"error\""));

    // The fetch task may not have been polled yet on the test runtime
    for _ in 0..50 {
        if backend.calls() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_ok_message_rendered() {
    let backend = GatedBackend::immediate(greeting("ok"));
    let app = app_with(backend, 2000);

    let html = body_text(get_path(&app, "/").await).await;
    assert!(html.contains("<strong>Message:</strong> ok"));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn test_non_success_status_rendered_as_failure() {
    let backend = GatedBackend::immediate(Err(BackendError::Status(
        StatusCode::SERVICE_UNAVAILABLE,
    )));
    let app = app_with(backend, 2000);

    let html = body_text(get_path(&app, "/").await).await;
    assert!(html.contains("Failed to connect to backend"));
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("Request failed with status code 503"));
}

#[tokio::test]
async fn test_rerender_does_not_refetch() {
    let backend = GatedBackend::new(greeting("Hello from Zinad backend"));
    let app = app_with(backend.clone(), 0);

    let html = body_text(get_path(&app, "/").await).await;
    let page_id = page_id_from(&html);

    // Still loading on refresh
    let html = body_text(get_path(&app, &format!("/page/{page_id}")).await).await;
    assert!(html.contains("Loading..."));

    backend.release();
    let mut settled = String::new();
    for _ in 0..50 {
        settled = body_text(get_path(&app, &format!("/page/{page_id}")).await).await;
        if !settled.contains("Loading...") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(settled.contains("Hello from Zinad backend"));
    assert!(!settled.contains("http-equiv=\"refresh\""));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_each_visit_mounts_a_new_page() {
    let backend = GatedBackend::immediate(greeting("ok"));
    let app = app_with(backend.clone(), 2000);

    get_path(&app, "/").await;
    get_path(&app, "/").await;
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_unknown_page_redirects_to_mount() {
    let backend = GatedBackend::immediate(greeting("ok"));
    let app = app_with(backend.clone(), 0);

    for path in [
        "/page/00000000-0000-0000-0000-000000000000",
        "/page/not-a-uuid",
    ] {
        let response = get_path(&app, path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_health() {
    let app = app_with(GatedBackend::immediate(greeting("ok")), 0);

    let response = get_path(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["mounted_pages"].is_u64());
}

#[tokio::test]
async fn test_static_stylesheet() {
    let app = app_with(GatedBackend::immediate(greeting("ok")), 0);

    let response = get_path(&app, "/static/css/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CACHE_CONTROL]
        .to_str()
        .unwrap()
        .contains("immutable"));
}

// =============================================================================
// Real HTTP backend
// =============================================================================

async fn spawn_backend(router: Router) -> reqwest::Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    reqwest::Url::parse(&format!("http://{addr}/api/hello")).unwrap()
}

fn http_client(url: reqwest::Url) -> Arc<dyn BackendClient> {
    Arc::new(HttpBackendClient::new(url, Duration::from_secs(2), Duration::from_secs(1)).unwrap())
}

#[tokio::test]
async fn test_scenario_backend_greeting() {
    let url = spawn_backend(Router::new().route(
        "/api/hello",
        get(|| async { Json(serde_json::json!({"message": "Hello from Zinad backend"})) }),
    ))
    .await;
    let app = app_with(http_client(url), 3000);

    let html = body_text(get_path(&app, "/").await).await;
    assert!(html.contains("<strong>Message:</strong> Hello from Zinad backend"));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn test_scenario_backend_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = reqwest::Url::parse(&format!("http://{addr}/api/hello")).unwrap();
    let app = app_with(http_client(url), 3000);

    let html = body_text(get_path(&app, "/").await).await;
    assert!(html.contains("<strong>Message:</strong> Failed to connect to backend"));

    let start = html.find("<strong>Error:</strong>").expect("error line");
    let rest = &html[start + "<strong>Error:</strong>".len()..];
    let description = rest[..rest.find("</p>").unwrap()].trim();
    assert!(!description.is_empty());
}

#[tokio::test]
async fn test_scenario_malformed_json_is_failure() {
    let url = spawn_backend(Router::new().route(
        "/api/hello",
        get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{\"message\": ") }),
    ))
    .await;
    let app = app_with(http_client(url), 3000);

    let html = body_text(get_path(&app, "/").await).await;
    assert!(html.contains("Failed to connect to backend"));
    assert!(html.contains("Invalid response body"));
}
