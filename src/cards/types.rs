//! Core card types
//!
//! - `Card`: a submitted message moving from `to_review` to `done`
//! - `CardId`: the server's opaque identifier
//! - Input validation for new messages and closer names

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::error::{BoardError, BoardResult};

/// Maximum message length in characters
pub const MAX_MESSAGE_CHARS: usize = 800;

/// Opaque card identifier
///
/// The API may send ids as strings or integers; both normalize to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CardId(s),
            RawId::Number(n) => CardId(n.to_string()),
        })
    }
}

/// Lifecycle state of a card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    ToReview,
    Done,
    /// Any status this client does not know; shown in neither list
    #[serde(other)]
    Unknown,
}

/// A card as returned by the card API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub message: String,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
}

impl Card {
    /// Create a card awaiting review
    pub fn to_review(
        id: impl Into<CardId>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            status: CardStatus::ToReview,
            created_at,
            closed_at: None,
            closed_by: None,
        }
    }

    /// Builder method: move the card to done
    pub fn closed(mut self, closed_by: impl Into<String>, closed_at: DateTime<Utc>) -> Self {
        self.status = CardStatus::Done;
        self.closed_at = Some(closed_at);
        self.closed_by = Some(closed_by.into());
        self
    }

    pub fn is_to_review(&self) -> bool {
        self.status == CardStatus::ToReview
    }

    /// Done and carrying a close timestamp
    pub fn is_done(&self) -> bool {
        self.status == CardStatus::Done && self.closed_at.is_some()
    }
}

/// Validate a new card message, returning the trimmed text to submit
pub fn validate_message(input: &str) -> BoardResult<String> {
    let message = input.trim();

    if message.is_empty() {
        return Err(BoardError::validation("Message cannot be empty."));
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(BoardError::validation(format!(
            "Message exceeds {} character limit.",
            MAX_MESSAGE_CHARS
        )));
    }

    Ok(message.to_string())
}

/// Validate a closer name, returning the trimmed name
pub fn validate_closer(input: &str) -> BoardResult<String> {
    let closed_by = input.trim();

    if closed_by.is_empty() {
        return Err(BoardError::validation("Who moved this card is required."));
    }

    Ok(closed_by.to_string())
}

/// Counter text for the message input, e.g. `12 / 800`
pub fn char_counter(input: &str) -> String {
    format!("{} / {}", input.chars().count(), MAX_MESSAGE_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_message_trims() {
        assert_eq!(validate_message("  ship it \n").unwrap(), "ship it");
    }

    #[test]
    fn test_validate_message_empty() {
        for input in ["", "  ", "\t\n"] {
            let err = validate_message(input).unwrap_err();
            assert_eq!(err.to_string(), "Message cannot be empty.");
        }
    }

    #[test]
    fn test_validate_message_length() {
        let exact = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&exact).is_ok());

        let err = validate_message(&"a".repeat(MAX_MESSAGE_CHARS + 1)).unwrap_err();
        assert_eq!(err.to_string(), "Message exceeds 800 character limit.");

        // Surrounding whitespace does not count against the limit
        let padded = format!("   {}   ", exact);
        assert!(validate_message(&padded).is_ok());

        // Multi-byte characters count once
        assert!(validate_message(&"é".repeat(MAX_MESSAGE_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_closer() {
        assert_eq!(validate_closer(" Ada ").unwrap(), "Ada");
        let err = validate_closer("   ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Who moved this card is required.");
    }

    #[test]
    fn test_char_counter() {
        assert_eq!(char_counter(""), "0 / 800");
        assert_eq!(char_counter(" hi "), "4 / 800");
    }

    #[test]
    fn test_card_deserialization() {
        let json = r#"{
            "id": 42,
            "message": "Fix the printer",
            "status": "done",
            "createdAt": "2026-10-12T09:00:00Z",
            "closedAt": "2026-10-14T17:30:00Z",
            "closedBy": "Grace"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.id, CardId::new("42"));
        assert!(card.is_done());
        assert_eq!(card.closed_by.as_deref(), Some("Grace"));
        assert_eq!(
            card.closed_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 14, 17, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_card_unknown_status() {
        let json = r#"{
            "id": "c1",
            "message": "x",
            "status": "archived",
            "createdAt": "2026-10-12T09:00:00Z"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.status, CardStatus::Unknown);
        assert!(!card.is_to_review());
        assert!(!card.is_done());
    }

    #[test]
    fn test_done_without_closed_at_is_not_done() {
        let mut card = Card::to_review("c1", "x", Utc::now());
        card.status = CardStatus::Done;
        assert!(!card.is_done());
    }
}
