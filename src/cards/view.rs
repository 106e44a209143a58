//! View derivation
//!
//! Pure functions that turn the cached card set into the two board lists:
//! cards awaiting review (server order) and done cards (newest close first),
//! optionally bucketed by Monday-start week.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use std::collections::BTreeMap;

use super::types::Card;

/// Date format used in week labels, e.g. `Oct 12, 2026`
const WEEK_DATE_FORMAT: &str = "%b %d, %Y";

/// Date-time format used on cards, e.g. `Oct 12, 2026, 09:30`
const CARD_DATE_FORMAT: &str = "%b %d, %Y, %H:%M";

/// Time zone in which dates are shown and weeks are bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's local zone
    #[default]
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn utc() -> Self {
        DisplayZone::Fixed(Utc.fix())
    }

    /// Parse `local`, `utc`, or an offset such as `+02:00`, `-0530`, `+03`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "local" => return Some(DisplayZone::Local),
            "utc" | "z" => return Some(DisplayZone::utc()),
            _ => {}
        }

        let (sign, rest) = match s.as_bytes().first()? {
            b'+' => (1, &s[1..]),
            b'-' => (-1, &s[1..]),
            _ => return None,
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let (hours, minutes) = match digits.len() {
            2 => (digits.parse::<i32>().ok()?, 0),
            4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
            _ => return None,
        };
        if minutes >= 60 {
            return None;
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(DisplayZone::Fixed)
    }

    /// Monday of the week containing `at`, in this zone
    pub fn week_start(&self, at: &DateTime<Utc>) -> NaiveDate {
        match self {
            DisplayZone::Local => week_start(at, &Local),
            DisplayZone::Fixed(offset) => week_start(at, offset),
        }
    }

    /// Format a timestamp for display on a card
    pub fn format_timestamp(&self, at: &DateTime<Utc>) -> String {
        match self {
            DisplayZone::Local => at.with_timezone(&Local).format(CARD_DATE_FORMAT).to_string(),
            DisplayZone::Fixed(offset) => {
                at.with_timezone(offset).format(CARD_DATE_FORMAT).to_string()
            }
        }
    }
}

/// Cards awaiting review, in the order the server returned them
pub fn derive_to_review(cards: &[Card]) -> Vec<Card> {
    cards.iter().filter(|c| c.is_to_review()).cloned().collect()
}

/// Done cards with a close timestamp, most recently closed first
pub fn derive_done(cards: &[Card]) -> Vec<Card> {
    let mut done: Vec<Card> = cards.iter().filter(|c| c.is_done()).cloned().collect();
    sort_by_closed_desc(&mut done);
    done
}

fn sort_by_closed_desc(cards: &mut [Card]) {
    cards.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
}

/// Monday of the week containing `at`, as seen in `tz`
///
/// Sunday belongs to the week that started six days earlier.
pub fn week_start<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    let date = at.with_timezone(tz).date_naive();
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

/// Done cards closed within one Monday-to-Sunday week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup {
    /// Monday of the week
    pub start: NaiveDate,
    /// Cards in this week, most recently closed first
    pub cards: Vec<Card>,
}

impl WeekGroup {
    /// Sunday of the week (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    /// `Oct 12, 2026 - Oct 18, 2026`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(WEEK_DATE_FORMAT),
            self.end().format(WEEK_DATE_FORMAT)
        )
    }

    /// `Oct 12, 2026 - Oct 18, 2026 · 3 cards`
    pub fn summary(&self) -> String {
        let n = self.cards.len();
        format!("{} · {} card{}", self.label(), n, if n == 1 { "" } else { "s" })
    }
}

/// Group done cards by week, newest week first
pub fn group_by_week(cards: &[Card], zone: DisplayZone) -> Vec<WeekGroup> {
    let mut groups: BTreeMap<NaiveDate, Vec<Card>> = BTreeMap::new();

    for card in cards.iter().filter(|c| c.is_done()) {
        if let Some(closed_at) = card.closed_at {
            groups
                .entry(zone.week_start(&closed_at))
                .or_default()
                .push(card.clone());
        }
    }

    groups
        .into_iter()
        .rev()
        .map(|(start, mut cards)| {
            sort_by_closed_desc(&mut cards);
            WeekGroup { start, cards }
        })
        .collect()
}
