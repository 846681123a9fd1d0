#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use headcount_api::config::ServerConfig;
use headcount_api::router::{build_app_router, build_state};

/// Build a test `ServerConfig` pointing at `backend_api_url`.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default),
/// short timeouts and small body caps so limit tests stay cheap.
pub fn test_config(backend_api_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        backend_api_url: backend_api_url.to_string(),
        backend_timeout_secs: 5,
        public_api_url: "http://public.test".to_string(),
        max_upload_bytes: 64 * 1024,
        max_image_bytes: 64 * 1024,
    }
}

/// Build the full application router (same middleware stack as production)
/// talking to the backend at `backend_api_url`.
pub fn build_test_app(backend_api_url: &str) -> Router {
    let state = build_state(test_config(backend_api_url)).unwrap();
    build_app_router(state)
}

/// Serve `router` as the fake backend on an ephemeral port.
///
/// Returns the detect URL (`http://127.0.0.1:{port}/api/v1/detect`), i.e.
/// what `BACKEND_API_URL` would hold.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/v1/detect")
}

/// A detect URL nobody listens on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/detect")
}

/// Shared log of what the fake backend received.
pub type Seen = Arc<Mutex<Vec<String>>>;

pub fn seen() -> Seen {
    Arc::new(Mutex::new(Vec::new()))
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn request(app: Router, method: Method, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn body_bytes(response: Response<Body>) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Encode one file as a browser-style `multipart/form-data` body.
///
/// Returns `(content_type, body)`.
pub fn multipart_upload(filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----headcount-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
