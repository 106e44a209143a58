//! Terminal rendering: plain text for people, JSON for scripts.

use std::io::Write;
use std::sync::Mutex;

use super::{BoardView, DoneCardView, DoneView, Renderer};
use crate::controller::{MANIFESTO_TEXT, MANIFESTO_TITLE};

/// How the CLI prints the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// `json` selects JSON, anything else plain text
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Keeps the latest view and prints it on demand
///
/// A single CLI invocation renders several times (load, action, reload);
/// only the final state is worth printing.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    format: OutputFormat,
    last: Mutex<Option<BoardView>>,
}

impl TerminalRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            last: Mutex::new(None),
        }
    }

    /// Write the latest view to `out`
    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let Some(view) = last.as_ref() else {
            return Ok(());
        };

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(view).map_err(std::io::Error::other)?;
                writeln!(out, "{}", json)
            }
            OutputFormat::Text => write!(out, "{}", board_text(view)),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, view: &BoardView) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(view.clone());
    }
}

fn done_card_lines(card: &DoneCardView, indent: &str, lines: &mut Vec<String>) {
    lines.push(format!("{}[{}] {}", indent, card.id, card.message));
    lines.push(format!("{}     Created: {}", indent, card.created_at));
    lines.push(format!("{}     {}", indent, card.done_meta));
}

/// Plain-text rendering of the whole board
pub fn board_text(view: &BoardView) -> String {
    let mut lines = Vec::new();

    if view.onboarding_open {
        lines.push(format!("== {} ==", MANIFESTO_TITLE));
        lines.extend(MANIFESTO_TEXT.lines().map(str::to_string));
        lines.push("(run `anonboard manifesto --ack` once you understand)".to_string());
        lines.push(String::new());
    }

    if let Some(error) = &view.load_error {
        lines.push(format!("! {}", error));
        lines.push(String::new());
    }

    lines.push(format!("To Review ({})", view.to_review_count));
    if view.to_review.is_empty() {
        lines.push("  No cards in To Review.".to_string());
    }
    for card in &view.to_review {
        lines.push(format!("  [{}] {}", card.id, card.message));
        lines.push(format!("       Created: {}", card.created_at));
        if card.close_pending {
            lines.push("       (moving to Done...)".to_string());
        }
        if let Some(input) = card.closer_input.as_ref().filter(|i| !i.is_empty()) {
            lines.push(format!("       Closer: {}", input));
        }
        if let Some(error) = &card.error {
            lines.push(format!("       ! {}", error));
        }
    }

    lines.push(String::new());
    lines.push(format!("Done ({})", view.done_count));
    if view.done.is_empty() {
        lines.push("  No cards in Done yet.".to_string());
    }
    match &view.done {
        DoneView::Grouped { groups } => {
            for group in groups {
                let marker = if group.expanded { "v" } else { ">" };
                lines.push(format!("  {} {}", marker, group.summary));
                for card in &group.cards {
                    done_card_lines(card, "    ", &mut lines);
                }
            }
        }
        DoneView::Flat { cards } => {
            for card in cards {
                done_card_lines(card, "  ", &mut lines);
            }
        }
    }

    if let Some(modal) = &view.close_modal {
        lines.push(String::new());
        lines.push(format!("Moving card {} to Done", modal.card_id));
        if let Some(error) = &modal.error {
            lines.push(format!("  ! {}", error));
        }
    }

    let feedback = [&view.form.error, &view.form.success, &view.notice];
    if feedback.iter().any(|f| f.is_some()) {
        lines.push(String::new());
    }
    if let Some(error) = &view.form.error {
        lines.push(format!("! {}", error));
    }
    if let Some(success) = &view.form.success {
        lines.push(success.clone());
    }
    if let Some(notice) = &view.notice {
        lines.push(notice.clone());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
