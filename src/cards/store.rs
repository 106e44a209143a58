//! Card Store
//!
//! In-memory copy of the server's card set. The cache is replaced wholesale
//! on every load; there is no incremental update.

use super::error::BoardResult;
use super::types::{Card, CardId};
use super::view::{derive_done, derive_to_review, group_by_week, DisplayZone, WeekGroup};
use crate::client::CardApi;

/// Cached card set plus the views derived from it
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<Card>,
    loaded: bool,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an already-fetched card set
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            loaded: true,
        }
    }

    /// Fetch the full card set, replacing the cache
    ///
    /// On failure the previous cache is left untouched.
    pub async fn load(&mut self, api: &dyn CardApi) -> BoardResult<usize> {
        let cards = api.list_cards().await?;
        self.replace(cards);
        Ok(self.cards.len())
    }

    /// Replace the cache with a freshly fetched set
    pub fn replace(&mut self, cards: Vec<Card>) {
        tracing::debug!(count = cards.len(), "Card cache replaced");
        self.cards = cards;
        self.loaded = true;
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Whether at least one load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Whether `id` is currently awaiting review
    pub fn is_awaiting_review(&self, id: &CardId) -> bool {
        self.get(id).map(Card::is_to_review).unwrap_or(false)
    }

    pub fn to_review(&self) -> Vec<Card> {
        derive_to_review(&self.cards)
    }

    pub fn done(&self) -> Vec<Card> {
        derive_done(&self.cards)
    }

    pub fn done_by_week(&self, zone: DisplayZone) -> Vec<WeekGroup> {
        group_by_week(&self.cards, zone)
    }
}
