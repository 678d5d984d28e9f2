use async_trait::async_trait;
use chrono::{Local, Utc};
use std::sync::Arc;

use super::error::{EventServiceError, FeedError};
use super::model::{AggregateResult, Event, FeedOutcome, FeedSource};
use super::normalize::normalize_event;
use super::window::DateWindow;
use crate::infrastructure::fetch::CalendarFetcher;
use crate::infrastructure::ical::decode_calendar;

/// Immutable processing parameters for one service instance.
///
/// Constructed explicitly from configuration at startup and handed to the
/// service; tests build their own with distinct values.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub feeds: Vec<FeedSource>,
    pub max_events_per_feed: usize,
    pub window: DateWindow,
    /// When set, used as the location fallback instead of the feed's
    /// display name (the legacy single-feed behavior used `"TBA"` here).
    pub default_location: Option<String>,
}

#[derive(Clone)]
pub struct EventService {
    fetcher: Arc<dyn CalendarFetcher>,
    settings: Arc<IngestSettings>,
}

impl EventService {
    pub fn new(fetcher: Arc<dyn CalendarFetcher>, settings: Arc<IngestSettings>) -> Self {
        Self { fetcher, settings }
    }
}

#[async_trait]
pub trait EventServiceApi: Send + Sync {
    /// Fetch, decode and merge events from every configured feed.
    ///
    /// Feeds are processed concurrently and all outcomes are awaited; a
    /// failing feed contributes a failure outcome, never an error. The
    /// merged list is sorted by `(date, start)` after all feeds settle, so
    /// task completion order cannot influence the result.
    async fn aggregate_events(&self) -> Result<AggregateResult, EventServiceError>;
}

#[async_trait]
impl EventServiceApi for EventService {
    async fn aggregate_events(&self) -> Result<AggregateResult, EventServiceError> {
        let mut handles = Vec::with_capacity(self.settings.feeds.len());
        for source in self.settings.feeds.iter().cloned() {
            let service = self.clone();
            let name = source.name.clone();
            handles.push((
                name,
                tokio::spawn(async move { service.process_feed(&source).await }),
            ));
        }

        let mut feed_results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                // A panicking feed task is a defect, not an expected
                // failure; it still only fails its own feed.
                Err(err) => {
                    tracing::error!(feed = %name, error = %err, "Feed task aborted unexpectedly");
                    FeedOutcome::failure(name, "unexpected processing failure".to_string())
                }
            };
            feed_results.push(outcome);
        }

        let mut events: Vec<Event> = feed_results
            .iter()
            .filter(|outcome| outcome.success)
            .flat_map(|outcome| outcome.events.iter().cloned())
            .collect();
        sort_events(&mut events);

        Ok(AggregateResult {
            events,
            feed_results,
        })
    }
}

impl EventService {
    async fn process_feed(&self, source: &FeedSource) -> FeedOutcome {
        match self.load_feed_events(source).await {
            Ok(events) => {
                tracing::debug!(feed = %source.name, count = events.len(), "Feed processed");
                FeedOutcome::success(source.name.clone(), events)
            }
            Err(err) => {
                tracing::warn!(feed = %source.name, error = %err, "Feed failed to load");
                FeedOutcome::failure(source.name.clone(), err.to_string())
            }
        }
    }

    async fn load_feed_events(&self, source: &FeedSource) -> Result<Vec<Event>, FeedError> {
        let raw = self.fetcher.fetch(&source.url).await?;
        let calendar = decode_calendar(&raw)?;

        let now = Utc::now();
        let fallback_location = self
            .settings
            .default_location
            .as_deref()
            .unwrap_or(&source.name);

        let mut events = Vec::new();
        for decoded in calendar.events {
            if events.len() >= self.settings.max_events_per_feed {
                break;
            }

            // Window-filter on the raw decoded start so out-of-window
            // events skip validation entirely.
            if let Some(start) = decoded.effective_start(now) {
                if !self.settings.window.contains(start, now) {
                    continue;
                }
            }

            let key = decoded.key.clone();
            match normalize_event(decoded, fallback_location, now, &Local) {
                Ok(event) => events.push(event),
                Err(err) => {
                    tracing::warn!(feed = %source.name, event = %key, error = %err, "Skipping invalid event");
                }
            }
        }

        Ok(events)
    }
}

/// Sort by date, then start time; events without a start time rank first
/// within their date. Lexicographic comparison is safe because of the fixed
/// `YYYY-MM-DD` / `HH:MM` formats.
fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.date.cmp(&b.date).then_with(|| {
            a.start
                .as_deref()
                .unwrap_or("00:00")
                .cmp(b.start.as_deref().unwrap_or("00:00"))
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(uid: &str, date: &str, start: Option<&str>) -> Event {
        Event {
            uid: uid.to_string(),
            title: "Show".to_string(),
            date: date.to_string(),
            location: "Somewhere".to_string(),
            description: None,
            start: start.map(str::to_string),
            end: None,
        }
    }

    #[test]
    fn test_sorts_by_date_then_start() {
        let mut events = vec![
            event("c", "2024-01-02", Some("09:00")),
            event("a", "2024-01-01", Some("23:00")),
            event("b", "2024-01-02", Some("08:00")),
        ];
        sort_events(&mut events);
        let order: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_missing_start_sorts_first_within_its_date() {
        let mut events = vec![
            event("late", "2024-01-01", Some("19:30")),
            event("allday", "2024-01-01", None),
            event("morning", "2024-01-01", Some("08:00")),
        ];
        sort_events(&mut events);
        let order: Vec<&str> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(order, ["allday", "morning", "late"]);
    }
}
