//! New-card form state.

use crate::cards::{char_counter, MAX_MESSAGE_CHARS};
use crate::render::FormView;

/// Shown after a card was accepted
pub const SUBMIT_SUCCESS: &str = "Card added to To Review.";

#[derive(Debug, Clone, Default)]
pub(crate) struct SubmitForm {
    pub input: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub submitting: bool,
}

impl SubmitForm {
    /// Track a keystroke; a stale error clears once the input fits again
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        if self.input.chars().count() <= MAX_MESSAGE_CHARS {
            self.error = None;
        }
    }

    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// The card was created: reset the input and show success
    pub fn accept(&mut self) {
        self.input.clear();
        self.error = None;
        self.success = Some(SUBMIT_SUCCESS.to_string());
    }

    pub fn view(&self) -> FormView {
        FormView {
            input: self.input.clone(),
            counter: char_counter(&self.input),
            error: self.error.clone(),
            success: self.success.clone(),
            submitting: self.submitting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_raw_input() {
        let mut form = SubmitForm::default();
        form.set_input("  hi  ");
        assert_eq!(form.view().counter, "6 / 800");
    }

    #[test]
    fn test_error_cleared_only_when_within_limit() {
        let mut form = SubmitForm::default();
        form.error = Some("Message exceeds 800 character limit.".to_string());

        form.set_input(&"a".repeat(MAX_MESSAGE_CHARS + 5));
        assert!(form.error.is_some());

        form.set_input(&"a".repeat(MAX_MESSAGE_CHARS));
        assert!(form.error.is_none());
    }

    #[test]
    fn test_accept_resets() {
        let mut form = SubmitForm::default();
        form.set_input("ship it");
        form.accept();

        let view = form.view();
        assert_eq!(view.input, "");
        assert_eq!(view.counter, "0 / 800");
        assert_eq!(view.success.as_deref(), Some(SUBMIT_SUCCESS));
    }
}
