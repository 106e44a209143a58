//! Rendering
//!
//! The controller never draws anything itself. After every state change it
//! builds a [`BoardView`] and hands it to a [`Renderer`]. Front ends decide
//! what to do with it: the CLI prints it, tests record it.

mod text;

pub use text::{board_text, OutputFormat, TerminalRenderer};

use serde::Serialize;
use std::sync::Mutex;

use crate::cards::CardId;

/// Everything a front end needs to draw the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub to_review_count: usize,
    pub to_review: Vec<ToReviewCardView>,
    pub done_count: usize,
    pub done: DoneView,
    pub form: FormView,
    /// Present while the shared close modal is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_modal: Option<CloseModalView>,
    pub onboarding_open: bool,
    /// Shown instead of the lists when the initial load failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    /// Last successful close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// A card awaiting review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToReviewCardView {
    pub id: CardId,
    pub message: String,
    pub created_at: String,
    /// Close control disabled while its request is in flight
    pub close_pending: bool,
    /// Per-card closer input; `None` when closing goes through the modal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closer_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A done card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoneCardView {
    pub id: CardId,
    pub message: String,
    pub created_at: String,
    /// `Done by <closer> on <date>`
    pub done_meta: String,
}

/// One week of done cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGroupView {
    pub label: String,
    pub summary: String,
    /// Only the newest week starts expanded
    pub expanded: bool,
    pub cards: Vec<DoneCardView>,
}

/// The done column, flat or grouped by week
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "display", rename_all = "lowercase")]
pub enum DoneView {
    Grouped { groups: Vec<WeekGroupView> },
    Flat { cards: Vec<DoneCardView> },
}

impl DoneView {
    pub fn is_empty(&self) -> bool {
        match self {
            DoneView::Grouped { groups } => groups.is_empty(),
            DoneView::Flat { cards } => cards.is_empty(),
        }
    }
}

/// The new-card form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub input: String,
    /// `<len> / 800`
    pub counter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    pub submitting: bool,
}

/// The shared close modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseModalView {
    pub card_id: CardId,
    pub closer_input: String,
    pub pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rendering backend
pub trait Renderer: Send + Sync {
    fn render(&self, view: &BoardView);
}

/// Renderer that keeps every view it is given
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    views: Mutex<Vec<BoardView>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent view, if anything was rendered
    pub fn last(&self) -> Option<BoardView> {
        self.views
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.views.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn views(&self) -> Vec<BoardView> {
        self.views.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &BoardView) {
        self.views
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(view.clone());
    }
}
