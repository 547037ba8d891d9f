//! End-to-end requests through the HTTP dispatcher over the in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use serde_json::{json, Value};

use intercede::server::handle_request;
use intercede::{AppState, Args, InMemoryPrayerStore};

struct TestServer {
    state: Arc<AppState>,
    store: Arc<InMemoryPrayerStore>,
}

impl TestServer {
    fn new() -> Self {
        let store = Arc::new(InMemoryPrayerStore::new());
        let args = Args {
            allowed_origin: "https://app.example".to_string(),
            ..Default::default()
        };
        let state = Arc::new(AppState::new(args, store.clone()));
        Self { state, store }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, body) = self.send_raw(method, uri, body).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, hyper::HeaderMap, Bytes) {
        let bytes = body
            .map(|b| Bytes::from(b.to_string()))
            .unwrap_or_default();
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(bytes))
            .unwrap();
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();

        let response = handle_request(Arc::clone(&self.state), addr, req).await;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    async fn create(&self, body: Value) -> Value {
        let (status, json) = self.send(Method::POST, "/api/v1/prayers", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json
    }
}

#[tokio::test]
async fn create_then_get() {
    let server = TestServer::new();
    let created = server
        .create(json!({
            "title": "New job",
            "description": "Starting Monday",
            "category": "work",
            "priority": "high",
            "tags": ["provision"]
        }))
        .await;

    assert_eq!(created["pray_count"], 0);
    assert_eq!(created["priority"], "high");
    let id = created["id"].as_str().unwrap();
    assert_eq!(id.len(), 24);

    let (status, fetched) = server
        .send(Method::GET, &format!("/api/v1/prayers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_title_is_bad_request() {
    let server = TestServer::new();
    let (status, body) = server
        .send(
            Method::POST,
            "/api/v1/prayers",
            Some(json!({ "title": "", "description": "d" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, _) = server
        .send(Method::POST, "/api/v1/prayers", Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_accepts_null_optional_fields() {
    let server = TestServer::new();
    let created = server
        .create(json!({
            "title": "Exams",
            "description": "Finals next week",
            "tags": null,
            "category": null,
            "user_name": null,
            "priority": null
        }))
        .await;

    assert_eq!(created["tags"], json!([]));
    assert_eq!(created["category"], "");
    assert_eq!(created["priority"], "");
}

#[tokio::test]
async fn malformed_and_missing_ids() {
    let server = TestServer::new();

    let (status, body) = server.send(Method::GET, "/api/v1/prayers/nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = server
        .send(Method::GET, "/api/v1/prayers/0123456789abcdef01234567", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn search_requires_query() {
    let server = TestServer::new();
    server
        .create(json!({ "title": "Pray for GRACE", "description": "d" }))
        .await;

    for uri in [
        "/api/v1/prayers/search",
        "/api/v1/prayers/search?q=",
        "/api/v1/prayers/search?q=%20%20",
    ] {
        let (status, _) = server.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let (status, body) = server
        .send(Method::GET, "/api/v1/prayers/search?q=grace", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_merges_and_delete_removes() {
    let server = TestServer::new();
    let created = server
        .create(json!({ "title": "A", "description": "d", "category": "health" }))
        .await;
    let uri = format!("/api/v1/prayers/{}", created["id"].as_str().unwrap());

    let (status, updated) = server
        .send(Method::PUT, &uri, Some(json!({ "title": "B", "is_answered": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "B");
    assert_eq!(updated["is_answered"], true);
    assert_eq!(updated["category"], "health");

    let (status, body) = server.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = server.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pray_comment_and_record_prayer() {
    let server = TestServer::new();
    let created = server
        .create(json!({ "title": "A", "description": "d" }))
        .await;
    let base = format!("/api/v1/prayers/{}", created["id"].as_str().unwrap());

    let (status, body) = server
        .send(Method::POST, &format!("{}/pray", base), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Prayer count incremented");

    let (status, comment) = server
        .send(
            Method::POST,
            &format!("{}/comments", base),
            Some(json!({ "message": "standing with you", "user_name": "Lydia" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["prayer_request_id"], created["id"]);

    let (status, prayer) = server
        .send(Method::POST, &format!("{}/prayers", base), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(prayer["prayer_request_id"], created["id"]);

    let (_, comments) = server
        .send(Method::GET, &format!("{}/comments", base), None)
        .await;
    assert_eq!(comments.as_array().unwrap().len(), 1);

    let (_, fetched) = server.send(Method::GET, &base, None).await;
    assert_eq!(fetched["pray_count"], 2);
}

#[tokio::test]
async fn comment_on_missing_request_is_not_found() {
    let server = TestServer::new();
    let (status, _) = server
        .send(
            Method::POST,
            "/api/v1/prayers/0123456789abcdef01234567/comments",
            Some(json!({ "message": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_recent_and_category() {
    let server = TestServer::new();
    for (title, category) in [("a", "health"), ("b", "health"), ("c", "family")] {
        server
            .create(json!({ "title": title, "description": "d", "category": category }))
            .await;
    }

    let (status, stats) = server.send(Method::GET, "/api/v1/prayers/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_prayers"], 3);
    assert_eq!(stats["categories_count"]["health"], 2);
    assert_eq!(stats["recent_activity"], json!([]));

    let (_, recent) = server
        .send(Method::GET, "/api/v1/prayers/recent?limit=2", None)
        .await;
    assert_eq!(recent.as_array().unwrap().len(), 2);

    let (_, recent) = server
        .send(Method::GET, "/api/v1/prayers/recent?limit=abc", None)
        .await;
    assert_eq!(recent.as_array().unwrap().len(), 3);

    let (_, family) = server
        .send(Method::GET, "/api/v1/prayers/category/family", None)
        .await;
    assert_eq!(family.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unavailable_store_maps_to_503() {
    let server = TestServer::new();
    server.store.set_available(false);

    let (status, body) = server.send(Method::GET, "/api/v1/prayers", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "UNAVAILABLE");

    let (status, _) = server.send(Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = server.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn cors_headers_and_preflight() {
    let server = TestServer::new();

    let (status, headers, _) = server
        .send_raw(Method::OPTIONS, "/api/v1/prayers", None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://app.example"
    );
    assert!(headers.contains_key("access-control-allow-methods"));

    let (status, headers, _) = server.send_raw(Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://app.example"
    );
}
