#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use page_builder_api::auth::issue_token;
use page_builder_api::config::AppConfig;
use page_builder_api::routes;
use page_builder_api::state::AppState;
use page_builder_core::events::EventBus;
use page_builder_core::persist::MemoryPageStore;
use page_builder_core::types::ActorId;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        jwt_secret: SECRET.to_string(),
        event_bus_capacity: 64,
        log_level: "debug".to_string(),
        auto_save_interval: Duration::from_secs(30),
    }
}

/// The full application over an in-memory store, plus a handle on that store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryPageStore>,
    pub events: EventBus,
    pub actor: ActorId,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryPageStore::new());
        let events = EventBus::new(64);
        let state = AppState::new(
            store.clone(),
            Some(store.clone()),
            test_config(),
            events.clone(),
        );
        let actor = Uuid::new_v4();
        let token = issue_token(actor, SECRET, chrono::Duration::hours(1)).unwrap();
        Self {
            router: routes::build_app(state),
            store,
            events,
            actor,
            token,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    fn authed(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(self.authed("GET", uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_anonymous(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> Response<Body> {
        self.send(
            self.authed(method, uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response<Body> {
        self.json("POST", uri, body).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response<Body> {
        self.json("PUT", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(self.authed("DELETE", uri).body(Body::empty()).unwrap())
            .await
    }

    /// Create a page and return its id.
    pub async fn create_page(&self, slug: &str, title: &str) -> String {
        let response = self
            .post("/v1/pages", serde_json::json!({ "slug": slug, "title": title }))
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn heading(id: &str, order: usize, text: &str) -> Value {
    serde_json::json!({
        "id": id,
        "type": "heading",
        "order": order,
        "visibility": "visible",
        "config": { "text": text, "level": 2 }
    })
}

pub fn paragraph(id: &str, order: usize, text: &str) -> Value {
    serde_json::json!({
        "id": id,
        "type": "paragraph",
        "order": order,
        "config": { "text": text }
    })
}
