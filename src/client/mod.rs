//! Card API Client
//!
//! The remote card API is an external collaborator. Everything the board
//! needs from it goes through the [`CardApi`] trait:
//!
//! - `GET  /api/cards`            list cards
//! - `POST /api/cards`            create a card
//! - `POST /api/cards/{id}/close` close a card
//!
//! [`HttpCardApi`] talks to a real server; [`MemoryCardApi`] keeps cards in
//! memory and records every call, for tests and offline experiments.

mod http;
mod memory;

pub use http::{HttpCardApi, CLIENT_TOKEN_HEADER};
pub use memory::{ApiCall, MemoryCardApi};

use async_trait::async_trait;

use crate::cards::{BoardResult, Card, CardId};

/// Operations the board requires from the card API
#[async_trait]
pub trait CardApi: Send + Sync {
    /// Fetch every card the server knows about
    async fn list_cards(&self) -> BoardResult<Vec<Card>>;

    /// Submit a new card; the response shape is server-defined
    async fn create_card(&self, message: &str) -> BoardResult<serde_json::Value>;

    /// Move a card to done, attributed to `closed_by`
    async fn close_card(&self, id: &CardId, closed_by: &str) -> BoardResult<serde_json::Value>;
}
