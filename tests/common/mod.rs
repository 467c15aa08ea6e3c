//! Shared helpers for API tests: build the router over a store and send
//! JSON requests through it without a socket.

#![allow(dead_code)]

use std::sync::Arc;

use agenda::http_server::HttpServer;
use agenda::store::{DocumentStore, MemoryStore};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

pub fn app_with(store: Arc<dyn DocumentStore>) -> Router {
    HttpServer::build_router(store)
}

pub fn app() -> Router {
    app_with(memory_store())
}

/// Send a request and return status plus parsed JSON body (`Null` if empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Create a record and return its id by scanning the collection
pub async fn create_and_find_id(app: &Router, collection: &str, body: Value, nome: &str) -> String {
    let (status, _) = post(app, collection, body).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = get(app, collection).await;
    list.as_array()
        .unwrap()
        .iter()
        .find(|r| r["nome"] == nome)
        .and_then(|r| r["_id"].as_str())
        .unwrap()
        .to_string()
}

/// A well-formed id that no store has assigned
pub const UNKNOWN_ID: &str = "0123456789abcdef01234567";
