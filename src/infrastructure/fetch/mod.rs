use async_trait::async_trait;

use crate::domain::event::FeedError;

/// Retrieves raw iCalendar text from a feed URL.
///
/// Implementations classify their own failures: anything transport-level or
/// a non-success HTTP status is a fetch-kind error. No retries here; retry
/// policy, if any, belongs to the caller.
#[async_trait]
pub trait CalendarFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FeedError>;
}

pub struct HttpCalendarFetcher {
    client: reqwest::Client,
}

impl HttpCalendarFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CalendarFetcher for HttpCalendarFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))
    }
}
