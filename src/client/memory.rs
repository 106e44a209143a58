//! In-memory card API
//!
//! Behaves like a well-formed card server: ids are assigned sequentially,
//! closing is a one-way transition, and every call is recorded.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use super::CardApi;
use crate::cards::{BoardError, BoardResult, Card, CardId};

/// A call received by [`MemoryCardApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create { message: String },
    Close { id: CardId, closed_by: String },
}

#[derive(Default)]
struct MemoryState {
    cards: Vec<Card>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: VecDeque<BoardError>,
    close_gate: Option<Arc<Notify>>,
    list_gate: Option<Arc<Notify>>,
}

/// Card API backed by a vector in memory
#[derive(Default)]
pub struct MemoryCardApi {
    state: Mutex<MemoryState>,
}

impl MemoryCardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing card set
    pub fn with_cards(cards: Vec<Card>) -> Self {
        let api = Self::new();
        {
            let mut state = api.lock();
            state.next_id = cards.len() as u64;
            state.cards = cards;
        }
        api
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind; keep going
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next call fail with `error` (queued, one call each)
    pub fn fail_next(&self, error: BoardError) {
        self.lock().failures.push_back(error);
    }

    /// Hold every close call until the returned handle is notified
    pub fn pause_closes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().close_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Hold every list call until the returned handle is notified
    pub fn pause_lists(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().list_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Calls that would have changed server state
    pub fn mutation_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| !matches!(c, ApiCall::List))
            .count()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.lock().cards.clone()
    }

    fn record(&self, call: ApiCall) -> BoardResult<()> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CardApi for MemoryCardApi {
    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        self.record(ApiCall::List)?;

        let gate = self.lock().list_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(self.cards())
    }

    async fn create_card(&self, message: &str) -> BoardResult<Value> {
        self.record(ApiCall::Create {
            message: message.to_string(),
        })?;

        let mut state = self.lock();
        state.next_id += 1;
        let card = Card::to_review(format!("card-{}", state.next_id), message, Utc::now());
        state.cards.push(card.clone());

        serde_json::to_value(card).map_err(|e| BoardError::InvalidResponse(e.to_string()))
    }

    async fn close_card(&self, id: &CardId, closed_by: &str) -> BoardResult<Value> {
        self.record(ApiCall::Close {
            id: id.clone(),
            closed_by: closed_by.to_string(),
        })?;

        let gate = self.lock().close_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.lock();
        let card = state
            .cards
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| BoardError::api(404, Some("Card not found".to_string())))?;

        if !card.is_to_review() {
            return Err(BoardError::api(409, Some("Card already closed".to_string())));
        }

        let closed = card.clone().closed(closed_by, Utc::now());
        *card = closed.clone();

        serde_json::to_value(closed).map_err(|e| BoardError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_close() {
        let api = MemoryCardApi::new();
        let created = api.create_card("hello").await.unwrap();
        assert_eq!(created["status"], "to_review");

        let id = CardId::new(created["id"].as_str().unwrap());
        let closed = api.close_card(&id, "Ada").await.unwrap();
        assert_eq!(closed["closedBy"], "Ada");

        let err = api.close_card(&id, "Bob").await.unwrap_err();
        assert_eq!(err, BoardError::api(409, Some("Card already closed".to_string())));
        assert_eq!(api.mutation_count(), 3);
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed_once() {
        let api = MemoryCardApi::new();
        api.fail_next(BoardError::Network {
            detail: "down".to_string(),
        });

        assert!(api.list_cards().await.is_err());
        assert!(api.list_cards().await.is_ok());
        assert_eq!(api.calls(), vec![ApiCall::List, ApiCall::List]);
    }
}
