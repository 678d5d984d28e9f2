use crate::error::AppError;

/// Classification of a feed ingestion failure.
///
/// Errors carry their kind from the point of construction: the fetcher
/// builds fetch-kind errors, the decoder builds parse-kind errors. Nothing
/// infers the kind from message text after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    Fetch,
    Parse,
    Validation,
}

/// Failure while fetching, decoding or validating a single feed.
///
/// These never abort an aggregation run; the feed processor converts them
/// into a failure outcome for the one feed they belong to.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to fetch calendar: HTTP status {status}")]
    Status { status: u16 },
    #[error("failed to fetch calendar: {0}")]
    Transport(String),
    #[error("failed to parse calendar: {0}")]
    Parse(String),
    #[error("invalid event data: {0}")]
    Validation(String),
}

impl FeedError {
    pub fn kind(&self) -> FeedErrorKind {
        match self {
            Self::Status { .. } | Self::Transport(_) => FeedErrorKind::Fetch,
            Self::Parse(_) => FeedErrorKind::Parse,
            Self::Validation(_) => FeedErrorKind::Validation,
        }
    }
}

/// Failure of the aggregation orchestration itself, not attributable to
/// any single feed.
#[derive(Debug, thiserror::Error)]
pub enum EventServiceError {
    #[error("event aggregation failed: {0}")]
    Internal(String),
}

impl From<EventServiceError> for AppError {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
