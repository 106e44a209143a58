//! Board Controller
//!
//! Owns everything the board shows: the card cache, the new-card form, close
//! controls, and the onboarding panel. The card API, local storage and the
//! renderer are injected, so the controller runs the same against a real
//! server and a terminal as it does against fakes in tests.
//!
//! ## Flow
//!
//! 1. Validate input locally; rejections never reach the network
//! 2. Call the card API with the triggering control disabled
//! 3. On success, reload the full card set
//! 4. Rebuild the view and render it
//!
//! Actions take `&self`, so unrelated actions may overlap. The state lock is
//! never held across a network call.

mod close;
mod form;
mod onboarding;

pub use close::CLOSE_SUCCESS;
pub use form::SUBMIT_SUCCESS;
pub use onboarding::{Dismissal, MANIFESTO_TEXT, MANIFESTO_TITLE};

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cards::{
    validate_closer, validate_message, BoardError, BoardResult, Card, CardId, CardStore,
    DisplayZone,
};
use crate::client::CardApi;
use crate::local::LocalState;
use crate::render::{
    BoardView, DoneCardView, DoneView, Renderer, ToReviewCardView, WeekGroupView,
};
use close::CloseState;
use form::SubmitForm;

/// Shown when the board cannot be fetched on startup
pub const LOAD_FAILURE: &str = "Unable to load board. Check API configuration.";

/// How the done column is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneDisplay {
    /// Bucketed by Monday-start week, newest first
    #[default]
    Grouped,
    Flat,
}

/// How a closer name is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseInteraction {
    /// A closer input on every card
    #[default]
    Inline,
    /// One shared modal aimed at a single card
    Modal,
}

/// Presentation choices for the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardSettings {
    pub done_display: DoneDisplay,
    pub close_interaction: CloseInteraction,
    pub zone: DisplayZone,
}

/// What happened to a triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request went out and succeeded
    Applied,
    /// The same action was already in flight; nothing was sent
    Ignored,
}

#[derive(Debug, Default)]
struct BoardState {
    store: CardStore,
    form: SubmitForm,
    closes: CloseState,
    onboarding_open: bool,
    load_error: Option<String>,
    notice: Option<String>,
}

/// The single object driving the board
pub struct BoardController {
    api: Arc<dyn CardApi>,
    local: Arc<LocalState>,
    renderer: Arc<dyn Renderer>,
    settings: BoardSettings,
    state: RwLock<BoardState>,
}

impl BoardController {
    pub fn new(
        api: Arc<dyn CardApi>,
        local: Arc<LocalState>,
        renderer: Arc<dyn Renderer>,
        settings: BoardSettings,
    ) -> Self {
        Self {
            api,
            local,
            renderer,
            settings,
            state: RwLock::new(BoardState::default()),
        }
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// Startup: open onboarding if never acknowledged, then load the board
    pub async fn init(&self) -> BoardResult<()> {
        if !self.local.is_acknowledged() {
            self.state.write().await.onboarding_open = true;
        }

        let result = self.refresh().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Initial board load failed");
            self.state.write().await.load_error = Some(LOAD_FAILURE.to_string());
        }

        self.render().await;
        result
    }

    /// Reload the full card set and re-render
    pub async fn reload(&self) -> BoardResult<()> {
        let result = self.refresh().await;
        self.render().await;
        result
    }

    /// Fetch a fresh card set and swap it in
    async fn refresh(&self) -> BoardResult<()> {
        let mut fresh = CardStore::new();
        let count = fresh.load(self.api.as_ref()).await?;

        let mut state = self.state.write().await;
        state.store = fresh;
        state.load_error = None;
        tracing::debug!(count, "Board reloaded");
        Ok(())
    }

    async fn render(&self) {
        let view = self.view().await;
        self.renderer.render(&view);
    }

    /// Current cards, as last fetched
    pub async fn cards(&self) -> Vec<Card> {
        self.state.read().await.store.cards().to_vec()
    }

    /// Whether a card set has ever been fetched
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.store.is_loaded()
    }

    // ============================================
    // Card submission
    // ============================================

    /// Track the message input; updates the live counter
    pub async fn input_changed(&self, text: &str) {
        self.state.write().await.form.set_input(text);
        self.render().await;
    }

    /// Submit whatever is in the message input
    pub async fn submit(&self) -> BoardResult<Outcome> {
        let message = {
            let mut state = self.state.write().await;
            if state.form.submitting {
                tracing::debug!("Submit already in flight");
                return Ok(Outcome::Ignored);
            }
            state.form.clear_feedback();

            match validate_message(&state.form.input) {
                Ok(message) => {
                    state.form.submitting = true;
                    message
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Card rejected before submit");
                    state.form.error = Some(e.to_string());
                    drop(state);
                    self.render().await;
                    return Err(e);
                }
            }
        };
        self.render().await;

        let result = match self.api.create_card(&message).await {
            Ok(_) => {
                tracing::info!(chars = message.chars().count(), "Card created");
                self.after_mutation(|state, reload_error| {
                    state.form.submitting = false;
                    state.form.accept();
                    if let Some(e) = reload_error {
                        state.form.error = Some(e.to_string());
                    }
                })
                .await
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.form.submitting = false;
                state.form.error = Some(e.to_string());
                Err(e)
            }
        };

        self.render().await;
        result
    }

    /// Type `text` into the input and submit it
    pub async fn submit_message(&self, text: &str) -> BoardResult<Outcome> {
        self.state.write().await.form.set_input(text);
        self.submit().await
    }

    /// Reload after a successful mutation, then `settle` the triggering
    /// control with the reload error, if any
    ///
    /// The control stays disabled until the reload has landed; until then the
    /// cache still shows the card as it was before the mutation.
    async fn after_mutation<F>(&self, settle: F) -> BoardResult<Outcome>
    where
        F: FnOnce(&mut BoardState, Option<&BoardError>),
    {
        let reloaded = self.refresh().await;
        let mut state = self.state.write().await;
        settle(&mut *state, reloaded.as_ref().err());
        reloaded.map(|()| Outcome::Applied)
    }

    // ============================================
    // Card closure
    // ============================================

    /// Move a to-review card to done, attributed to `closer`
    ///
    /// While the request is in flight, further closes of the same card are
    /// ignored. Closing other cards is unaffected.
    pub async fn close_card(&self, id: &CardId, closer: &str) -> BoardResult<Outcome> {
        let closed_by = {
            let mut state = self.state.write().await;
            if state.closes.is_pending(id) {
                tracing::debug!(card = %id, "Close already in flight");
                return Ok(Outcome::Ignored);
            }
            state.notice = None;

            let checked = validate_closer(closer).and_then(|name| {
                if state.store.is_awaiting_review(id) {
                    Ok(name)
                } else {
                    Err(BoardError::validation(format!(
                        "Card {} is not awaiting review.",
                        id
                    )))
                }
            });

            match checked {
                Ok(name) => {
                    state.closes.begin(id);
                    name
                }
                Err(e) => {
                    tracing::debug!(card = %id, error = %e, "Close rejected before submit");
                    state.closes.set_error(id, e.to_string());
                    drop(state);
                    self.render().await;
                    return Err(e);
                }
            }
        };
        self.render().await;

        let result = match self.api.close_card(id, &closed_by).await {
            Ok(_) => {
                tracing::info!(card = %id, "Card closed");
                self.after_mutation(|state, reload_error| {
                    state.closes.finish(id, true);
                    state.notice = Some(CLOSE_SUCCESS.to_string());
                    if let Some(e) = reload_error {
                        state.closes.set_error(id, e.to_string());
                    }
                })
                .await
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.closes.finish(id, false);
                state.closes.set_error(id, e.to_string());
                Err(e)
            }
        };

        self.render().await;
        result
    }

    /// Whether a close request for `id` is in flight
    pub async fn is_close_pending(&self, id: &CardId) -> bool {
        self.state.read().await.closes.is_pending(id)
    }

    /// Inline shape: track the closer input on one card
    pub async fn set_closer_input(&self, id: &CardId, text: &str) {
        self.state.write().await.closes.set_input(id, text);
        self.render().await;
    }

    /// Inline shape: close a card with the name typed on it
    pub async fn close_inline(&self, id: &CardId) -> BoardResult<Outcome> {
        let closer = self.state.read().await.closes.input(id);
        self.close_card(id, &closer).await
    }

    /// Modal shape: open the shared modal aimed at `id`
    pub async fn open_close_modal(&self, id: &CardId) {
        self.state.write().await.closes.open_modal(id);
        self.render().await;
    }

    /// Modal shape: track the modal's closer input
    pub async fn set_modal_closer(&self, text: &str) {
        if let Some(modal) = self.state.write().await.closes.modal.as_mut() {
            modal.closer_input = text.to_string();
        }
        self.render().await;
    }

    /// Modal shape: close the active target with the modal's closer
    pub async fn confirm_close_modal(&self) -> BoardResult<Outcome> {
        let (target, closer) = match self.state.read().await.closes.modal.as_ref() {
            Some(modal) => (modal.target.clone(), modal.closer_input.clone()),
            None => return Err(BoardError::validation("No card selected.")),
        };
        self.close_card(&target, &closer).await
    }

    /// Modal shape: close the modal and clear the active target
    pub async fn cancel_close_modal(&self) {
        self.state.write().await.closes.modal = None;
        self.render().await;
    }

    // ============================================
    // Onboarding
    // ============================================

    pub async fn open_onboarding(&self) {
        self.state.write().await.onboarding_open = true;
        self.render().await;
    }

    /// Close the panel; only `Dismissal::Understood` persists acknowledgment
    pub async fn dismiss_onboarding(&self, how: Dismissal) {
        if how.acknowledges() {
            self.local.acknowledge();
            tracing::info!("Onboarding acknowledged");
        }
        self.state.write().await.onboarding_open = false;
        self.render().await;
    }

    pub async fn is_onboarding_open(&self) -> bool {
        self.state.read().await.onboarding_open
    }

    // ============================================
    // View
    // ============================================

    /// Build the view model from the current state
    pub async fn view(&self) -> BoardView {
        let state = self.state.read().await;
        let zone = self.settings.zone;
        let inline = self.settings.close_interaction == CloseInteraction::Inline;

        let to_review: Vec<ToReviewCardView> = state
            .store
            .to_review()
            .into_iter()
            .map(|card| ToReviewCardView {
                created_at: zone.format_timestamp(&card.created_at),
                close_pending: state.closes.is_pending(&card.id),
                closer_input: inline.then(|| state.closes.input(&card.id)),
                error: state.closes.error(&card.id),
                id: card.id,
                message: card.message,
            })
            .collect();

        let done_cards = state.store.done();
        let done_count = done_cards.len();
        let done = match self.settings.done_display {
            DoneDisplay::Flat => DoneView::Flat {
                cards: done_cards.iter().map(|c| done_card_view(c, zone)).collect(),
            },
            DoneDisplay::Grouped => DoneView::Grouped {
                groups: state
                    .store
                    .done_by_week(zone)
                    .iter()
                    .enumerate()
                    .map(|(i, group)| WeekGroupView {
                        label: group.label(),
                        summary: group.summary(),
                        expanded: i == 0,
                        cards: group.cards.iter().map(|c| done_card_view(c, zone)).collect(),
                    })
                    .collect(),
            },
        };

        BoardView {
            to_review_count: to_review.len(),
            to_review,
            done_count,
            done,
            form: state.form.view(),
            close_modal: state.closes.modal_view(),
            onboarding_open: state.onboarding_open,
            load_error: state.load_error.clone(),
            notice: state.notice.clone(),
        }
    }
}

fn done_card_view(card: &Card, zone: DisplayZone) -> DoneCardView {
    let closed_at = card
        .closed_at
        .map(|at| zone.format_timestamp(&at))
        .unwrap_or_default();

    DoneCardView {
        id: card.id.clone(),
        message: card.message.clone(),
        created_at: zone.format_timestamp(&card.created_at),
        done_meta: format!(
            "Done by {} on {}",
            card.closed_by.as_deref().unwrap_or_default(),
            closed_at
        ),
    }
}
