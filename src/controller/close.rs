//! Card closure state: per-card inputs and errors, in-flight guards, and
//! the shared modal's single active target.

use std::collections::{HashMap, HashSet};

use crate::cards::CardId;
use crate::render::CloseModalView;

/// Shown after a card was moved to done
pub const CLOSE_SUCCESS: &str = "Card moved to Done.";

#[derive(Debug, Clone)]
pub(crate) struct CloseModal {
    pub target: CardId,
    pub closer_input: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CloseState {
    inputs: HashMap<CardId, String>,
    errors: HashMap<CardId, String>,
    pending: HashSet<CardId>,
    pub modal: Option<CloseModal>,
}

impl CloseState {
    pub fn input(&self, id: &CardId) -> String {
        self.inputs.get(id).cloned().unwrap_or_default()
    }

    pub fn set_input(&mut self, id: &CardId, text: &str) {
        self.inputs.insert(id.clone(), text.to_string());
    }

    pub fn error(&self, id: &CardId) -> Option<String> {
        self.errors.get(id).cloned()
    }

    pub fn set_error(&mut self, id: &CardId, message: String) {
        self.errors.insert(id.clone(), message);
    }

    pub fn is_pending(&self, id: &CardId) -> bool {
        self.pending.contains(id)
    }

    /// Disable the card's close control; false if it already was
    pub fn begin(&mut self, id: &CardId) -> bool {
        self.errors.remove(id);
        self.pending.insert(id.clone())
    }

    /// Re-enable the control. On success the card's input is dropped and the
    /// modal closes if it was aimed at this card.
    pub fn finish(&mut self, id: &CardId, succeeded: bool) {
        self.pending.remove(id);
        if succeeded {
            self.inputs.remove(id);
            self.errors.remove(id);
            if self.modal.as_ref().map(|m| &m.target == id).unwrap_or(false) {
                self.modal = None;
            }
        }
    }

    pub fn open_modal(&mut self, id: &CardId) {
        self.errors.remove(id);
        self.modal = Some(CloseModal {
            target: id.clone(),
            closer_input: String::new(),
        });
    }

    pub fn modal_view(&self) -> Option<CloseModalView> {
        self.modal.as_ref().map(|m| CloseModalView {
            card_id: m.target.clone(),
            closer_input: m.closer_input.clone(),
            pending: self.is_pending(&m.target),
            error: self.error(&m.target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_exclusive_per_card() {
        let mut state = CloseState::default();
        let a = CardId::new("a");
        let b = CardId::new("b");

        assert!(state.begin(&a));
        assert!(!state.begin(&a));
        assert!(state.begin(&b));

        state.finish(&a, false);
        assert!(!state.is_pending(&a));
        assert!(state.is_pending(&b));
    }

    #[test]
    fn test_success_closes_matching_modal_only() {
        let mut state = CloseState::default();
        let a = CardId::new("a");
        let b = CardId::new("b");

        state.open_modal(&a);
        state.begin(&b);
        state.finish(&b, true);
        assert!(state.modal.is_some());

        state.begin(&a);
        state.finish(&a, true);
        assert!(state.modal.is_none());
    }

    #[test]
    fn test_failure_keeps_input() {
        let mut state = CloseState::default();
        let a = CardId::new("a");
        state.set_input(&a, "Ada");
        state.begin(&a);
        state.set_error(&a, "Request failed".to_string());
        state.finish(&a, false);

        assert_eq!(state.input(&a), "Ada");
        assert_eq!(state.error(&a).as_deref(), Some("Request failed"));
    }
}
