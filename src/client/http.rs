//! HTTP implementation of the card API, built on reqwest.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method};
use serde_json::Value;

use super::CardApi;
use crate::cards::{BoardError, BoardResult, Card, CardId};

/// Header carrying the anonymous client identity
pub const CLIENT_TOKEN_HEADER: &str = "X-Client-Token";

/// Card API client over HTTP
///
/// No client-side timeout and no retries: a request runs until the
/// transport itself succeeds or fails.
pub struct HttpCardApi {
    client: Client,
    base_url: String,
    client_token: String,
}

impl HttpCardApi {
    /// Create a client for `base_url` (e.g. "http://localhost:3000")
    pub fn new(base_url: &str, client_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_token: client_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the JSON payload
    ///
    /// Empty or non-JSON bodies decode as `{}`. A non-success status becomes
    /// `BoardError::Api` carrying the payload's `error` string when present.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> BoardResult<Value> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Card API request");

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(CLIENT_TOKEN_HEADER, &self.client_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, %url, "Card API request failed");
            BoardError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let payload: Value =
            serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Default::default()));

        if !status.is_success() {
            let message = payload
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            tracing::warn!(status = status.as_u16(), message = ?message, "Card API returned error");
            return Err(BoardError::api(status.as_u16(), message));
        }

        Ok(payload)
    }
}

#[async_trait]
impl CardApi for HttpCardApi {
    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        let payload = self.send(Method::GET, "/api/cards", None).await?;
        match payload.get("cards") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(cards) => serde_json::from_value(cards.clone())
                .map_err(|e| BoardError::InvalidResponse(e.to_string())),
        }
    }

    async fn create_card(&self, message: &str) -> BoardResult<Value> {
        let body = serde_json::json!({ "message": message });
        self.send(Method::POST, "/api/cards", Some(body)).await
    }

    async fn close_card(&self, id: &CardId, closed_by: &str) -> BoardResult<Value> {
        let path = format!("/api/cards/{}/close", urlencoding::encode(id.as_str()));
        let body = serde_json::json!({ "closedBy": closed_by });
        self.send(Method::POST, &path, Some(body)).await
    }
}
