pub mod error;
pub mod model;
pub mod normalize;
pub mod service;
pub mod window;

pub use error::{EventServiceError, FeedError, FeedErrorKind};
pub use model::{
    AggregateResult, DecodedCalendar, DecodedEvent, DecodedInstant, Event, EventStatus,
    FeedOutcome, FeedSource,
};
pub use service::{EventService, EventServiceApi, IngestSettings};
pub use window::DateWindow;

use serde::{Deserialize, Serialize};

/// Response for GET /api/events
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
    #[serde(rename = "_metadata")]
    pub metadata: FeedMetadata,
}

/// Aggregation summary counts, derived from the per-feed outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    pub total_feeds: usize,
    pub successful_feeds: usize,
    pub failed_feeds: usize,
    pub total_events: usize,
}

impl From<&AggregateResult> for FeedMetadata {
    fn from(result: &AggregateResult) -> Self {
        Self {
            total_feeds: result.feed_results.len(),
            successful_feeds: result.feed_results.iter().filter(|r| r.success).count(),
            failed_feeds: result.feed_results.iter().filter(|r| !r.success).count(),
            total_events: result.events.len(),
        }
    }
}
