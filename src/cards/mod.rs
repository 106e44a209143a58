//! Cards
//!
//! The card model and everything derived from it.
//!
//! - **types**: `Card`, `CardId`, `CardStatus`, input validation
//! - **view**: to-review / done derivation and week grouping
//! - **store**: the in-memory cache refreshed from the card API
//! - **error**: `BoardError`, shared by every board operation

pub mod error;
pub mod store;
pub mod types;
pub mod view;

pub use error::{BoardError, BoardResult, GENERIC_FAILURE};
pub use store::CardStore;
pub use types::{
    char_counter, validate_closer, validate_message, Card, CardId, CardStatus, MAX_MESSAGE_CHARS,
};
pub use view::{derive_done, derive_to_review, group_by_week, week_start, DisplayZone, WeekGroup};
