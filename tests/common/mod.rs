//! Fake card server for integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Headers seen on one request
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub client_token: Option<String>,
    pub content_type: Option<String>,
    pub content_type_count: usize,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct FakeServer {
    pub cards: Vec<Value>,
    pub requests: Vec<SeenRequest>,
    next_id: u64,
}

pub type Shared = Arc<Mutex<FakeServer>>;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record(state: &Shared, path: String, headers: &HeaderMap, body: String) {
    state.lock().unwrap().requests.push(SeenRequest {
        path,
        client_token: header(headers, "x-client-token"),
        content_type: header(headers, "content-type"),
        content_type_count: headers.get_all("content-type").iter().count(),
        body,
    });
}

async fn list_cards(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record(&state, "/api/cards".to_string(), &headers, String::new());
    let cards = state.lock().unwrap().cards.clone();
    Json(json!({ "cards": cards }))
}

async fn create_card(State(state): State<Shared>, headers: HeaderMap, body: String) -> Response {
    record(&state, "/api/cards".to_string(), &headers, body.clone());

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string));
    let Some(message) = message else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "message is required" })))
            .into_response();
    };

    let mut server = state.lock().unwrap();
    server.next_id += 1;
    let card = json!({
        "id": server.next_id,
        "message": message,
        "status": "to_review",
        "createdAt": chrono::Utc::now().to_rfc3339(),
    });
    server.cards.push(card.clone());
    (StatusCode::CREATED, Json(card)).into_response()
}

async fn close_card(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    record(&state, format!("/api/cards/{}/close", id), &headers, body.clone());

    let closed_by = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["closedBy"].as_str().map(str::to_string))
        .unwrap_or_default();

    let mut server = state.lock().unwrap();
    let card = server.cards.iter_mut().find(|c| match &c["id"] {
        Value::String(s) => s == &id,
        other => other.to_string() == id,
    });
    let Some(card) = card else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Card not found" }))).into_response();
    };
    if card["status"] == "done" {
        return (StatusCode::CONFLICT, Json(json!({ "error": "Card already closed" })))
            .into_response();
    }

    card["status"] = json!("done");
    card["closedAt"] = json!(chrono::Utc::now().to_rfc3339());
    card["closedBy"] = json!(closed_by);
    Json(card.clone()).into_response()
}

/// Router behaving like a healthy card API
pub fn card_router(state: Shared) -> Router {
    Router::new()
        .route("/api/cards", get(list_cards).post(create_card))
        .route("/api/cards/:id/close", post(close_card))
        .with_state(state)
}

/// Serve `router` on an ephemeral port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Start a healthy fake card API, optionally seeded
pub async fn spawn_card_server(cards: Vec<Value>) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(FakeServer {
        next_id: cards.len() as u64,
        cards,
        ..Default::default()
    }));
    let url = spawn(card_router(state.clone())).await;
    (url, state)
}
