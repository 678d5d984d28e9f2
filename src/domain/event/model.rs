use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One configured external calendar origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

/// Structured calendar produced by the decoder
#[derive(Debug, Clone)]
pub struct DecodedCalendar {
    pub events: Vec<DecodedEvent>,
    pub calendar_name: Option<String>,
    pub timezone: Option<String>,
}

/// A decoded VEVENT before validation.
///
/// Individual decoded events may be malformed (missing or unparseable
/// fields); that is tolerated per-event by the normalizer, never per-feed.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    /// Positional key of the component within its calendar, used as the
    /// uid fallback when the VEVENT carries none.
    pub key: String,
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DecodedInstant>,
    pub end: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub status: Option<EventStatus>,
}

/// A decoded start time: either a resolved instant, or the raw value that
/// could not be resolved (kept for the rejection diagnostic).
#[derive(Debug, Clone)]
pub enum DecodedInstant {
    Valid(DateTime<Utc>),
    Invalid(String),
}

/// STATUS of a decoded VEVENT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl DecodedEvent {
    /// The start instant the date-window filter operates on.
    ///
    /// Absent starts resolve to `now` (an event with no start time is
    /// treated as starting at processing time). Unresolvable starts yield
    /// `None` so the normalizer can reject them with a diagnostic.
    pub fn effective_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.start {
            None => Some(now),
            Some(DecodedInstant::Valid(instant)) => Some(*instant),
            Some(DecodedInstant::Invalid(_)) => None,
        }
    }
}

/// Canonical event served to the presentation layer.
///
/// `date` is `YYYY-MM-DD`, `start`/`end` are zero-padded `HH:MM`, all
/// formatted in the serving process's local timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Per-feed result of one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedOutcome {
    pub name: String,
    pub success: bool,
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedOutcome {
    pub fn success(name: String, events: Vec<Event>) -> Self {
        Self {
            name,
            success: true,
            events,
            error: None,
        }
    }

    pub fn failure(name: String, error: String) -> Self {
        Self {
            name,
            success: false,
            events: Vec::new(),
            error: Some(error),
        }
    }
}

/// Merged result of aggregating all configured feeds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    pub events: Vec<Event>,
    pub feed_results: Vec<FeedOutcome>,
}

impl AggregateResult {
    pub fn metadata(&self) -> super::FeedMetadata {
        super::FeedMetadata::from(self)
    }
}
