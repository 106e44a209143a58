//! Onboarding ("manifesto") panel.

/// Panel title
pub const MANIFESTO_TITLE: &str = "Anonymous Initiative Manifesto";

/// Panel body
pub const MANIFESTO_TEXT: &str = "\
Anyone can raise a card here, and nobody has to sign it.
Write what should be looked at, not who is to blame.
Cards stay in To Review until someone takes ownership and moves them to Done.
Whoever moves a card puts their name on it; that is the only attribution on this board.";

/// How the panel was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// The explicit "I understand" action; persists acknowledgment
    Understood,
    Backdrop,
    Escape,
    CloseButton,
}

impl Dismissal {
    pub fn acknowledges(self) -> bool {
        matches!(self, Dismissal::Understood)
    }
}
