use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{events::EventsController, health};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Build the application router with all routes configured
pub fn build_router(config: Arc<Config>, events_controller: Arc<EventsController>) -> Router {
    // Event routes (public)
    let event_routes = Router::new()
        .route("/api/events", get(EventsController::get_events))
        .with_state(events_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config)
        .merge(event_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    events_controller: Arc<EventsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(config.clone(), events_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
