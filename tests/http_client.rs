//! HttpCardApi against a fake card server.

mod common;

use anonboard::{BoardError, CardApi, CardId, CardStatus, HttpCardApi};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

#[tokio::test]
async fn test_requests_carry_token_and_content_type() {
    let (url, server) = common::spawn_card_server(Vec::new()).await;
    let api = HttpCardApi::new(&url, "token-123");

    api.create_card("hello").await.unwrap();
    api.list_cards().await.unwrap();

    let requests = server.lock().unwrap().requests.clone();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.client_token.as_deref(), Some("token-123"));
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
        assert_eq!(request.content_type_count, 1);
    }
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, json!({ "message": "hello" }));
}

#[tokio::test]
async fn test_create_list_close_round_trip() {
    let (url, _server) = common::spawn_card_server(Vec::new()).await;
    let api = HttpCardApi::new(&format!("{}/", url), "token");

    let created = api.create_card("Printer on fire").await.unwrap();
    let id = CardId::new(created["id"].to_string());

    let cards = api.list_cards().await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, id);
    assert_eq!(cards[0].status, CardStatus::ToReview);

    let closed = api.close_card(&id, "Ada").await.unwrap();
    assert_eq!(closed["closedBy"], "Ada");

    let cards = api.list_cards().await.unwrap();
    assert!(cards[0].is_done());
    assert_eq!(cards[0].closed_by.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_close_encodes_card_id() {
    let seeded = json!({
        "id": "needs review",
        "message": "x",
        "status": "to_review",
        "createdAt": "2026-10-12T09:00:00Z",
    });
    let (url, server) = common::spawn_card_server(vec![seeded]).await;
    let api = HttpCardApi::new(&url, "token");

    api.close_card(&CardId::new("needs review"), "Lin")
        .await
        .unwrap();

    let requests = server.lock().unwrap().requests.clone();
    assert_eq!(requests[0].path, "/api/cards/needs review/close");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&requests[0].body).unwrap(),
        json!({ "closedBy": "Lin" })
    );
}

#[tokio::test]
async fn test_error_payload_message_is_surfaced() {
    let (url, _server) = common::spawn_card_server(Vec::new()).await;
    let api = HttpCardApi::new(&url, "token");

    let err = api
        .close_card(&CardId::new("404"), "Ada")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BoardError::Api {
            status: 404,
            message: "Card not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_json_error_body_uses_generic_message() {
    let router = Router::new().route(
        "/api/cards",
        post(|| async { (StatusCode::BAD_GATEWAY, "<html>Bad gateway</html>") }),
    );
    let url = common::spawn(router).await;
    let api = HttpCardApi::new(&url, "token");

    let err = api.create_card("hello").await.unwrap_err();
    assert_eq!(err, BoardError::api(502, None));
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_error_without_error_field() {
    let router = Router::new().route(
        "/api/cards",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "boom" }))) }),
    );
    let url = common::spawn(router).await;
    let api = HttpCardApi::new(&url, "token");

    let err = api.list_cards().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_empty_success_body_lists_no_cards() {
    let router = Router::new().route("/api/cards", get(|| async { StatusCode::OK }));
    let url = common::spawn(router).await;
    let api = HttpCardApi::new(&url, "token");

    assert!(api.list_cards().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_cards_are_invalid_response() {
    let router = Router::new().route(
        "/api/cards",
        get(|| async { Json(json!({ "cards": [{ "id": 1 }] })) }),
    );
    let url = common::spawn(router).await;
    let api = HttpCardApi::new(&url, "token");

    let err = api.list_cards().await.unwrap_err();
    assert!(matches!(err, BoardError::InvalidResponse(_)));
}
