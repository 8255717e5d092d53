#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use portal_frontend::config::BackendSettings;
use portal_frontend::models::{Role, User};
use portal_frontend::services::ApiClient;
use portal_frontend::session::{MemoryStorage, SessionStorage, SessionStore};
use portal_frontend::AppState;
use std::sync::Arc;
use wiremock::MockServer;

pub fn api_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&BackendSettings {
        url: server.uri(),
        extractor_url: server.uri(),
    }))
}

/// A backend nobody listens on.
pub fn unreachable_api() -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&BackendSettings {
        url: "http://127.0.0.1:1".to_string(),
        extractor_url: "http://127.0.0.1:1".to_string(),
    }))
}

pub fn memory_sessions() -> Arc<SessionStore> {
    Arc::new(SessionStore::initialize(Arc::new(MemoryStorage::default())))
}

pub fn sessions_on(storage: Arc<dyn SessionStorage>) -> Arc<SessionStore> {
    Arc::new(SessionStore::initialize(storage))
}

pub fn state_for(server: &MockServer) -> AppState {
    AppState::new(api_for(server), memory_sessions())
}

pub fn user(id: i64, role: Role) -> User {
    User {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        role,
        active: true,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "portal-test-boundary";

/// `multipart/form-data` POST. Each part is `(name, file_name, content)`.
pub fn multipart_post(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{}\r\n", MULTIPART_BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
