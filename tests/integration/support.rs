//! Shared helpers: an app over the in-memory store, driven without a socket

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_server::{
    api,
    models::{Book, BookFilter},
    repository::{BookStore, CollectionOptions, MemoryDatabase},
    services::{bootstrap, seed, Services},
    AppConfig, AppState,
};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn BookStore>,
}

impl TestApp {
    pub async fn empty() -> Self {
        Self::build(false, CollectionOptions::default()).await
    }

    pub async fn seeded() -> Self {
        Self::build(true, CollectionOptions::default()).await
    }

    pub async fn build(seeded: bool, options: CollectionOptions) -> Self {
        let db = MemoryDatabase::new();
        let store = bootstrap::ensure_collection(&db, "exercise-1", "information", options)
            .await
            .expect("bootstrap");
        if seeded {
            seed::seed_books(store.as_ref(), &seed::STARTER_BOOKS)
                .await
                .expect("seed");
        }

        let state = AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(Services::new(store.clone(), Duration::from_secs(5))),
        };
        Self {
            router: api::create_router(state),
            store,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, bytes.to_vec())
    }

    pub async fn raw(&self, method: Method, uri: &str, content_type: &str, body: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .expect("request");
        self.router.clone().oneshot(request).await.expect("response").status()
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.request(Method::GET, uri, None).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let (status, body) = self.request(Method::GET, uri, None).await;
        (status, String::from_utf8(body).expect("utf-8 body"))
    }

    pub async fn all_books(&self) -> Vec<Book> {
        self.store.find(&BookFilter::all()).await.expect("find")
    }
}
