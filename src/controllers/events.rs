use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::event::{EventService, EventServiceApi, EventsResponse};
use crate::error::AppResult;

pub struct EventsController {
    event_service: Arc<EventService>,
}

impl EventsController {
    pub fn new(event_service: Arc<EventService>) -> Self {
        Self { event_service }
    }

    /// GET /api/events - Aggregate events from all configured feeds
    pub async fn get_events(
        State(controller): State<Arc<EventsController>>,
    ) -> AppResult<Json<EventsResponse>> {
        let result = controller.event_service.aggregate_events().await?;

        let failed: Vec<String> = result
            .feed_results
            .iter()
            .filter(|outcome| !outcome.success)
            .map(|outcome| {
                format!(
                    "{}: {}",
                    outcome.name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();
        if !failed.is_empty() {
            tracing::warn!(failed_feeds = ?failed, "Some feeds failed to load");
        }

        let metadata = result.metadata();
        Ok(Json(EventsResponse {
            events: result.events,
            metadata,
        }))
    }
}
