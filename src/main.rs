use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigcal_backend::controllers::events::EventsController;
use gigcal_backend::domain::event::{DateWindow, EventService, IngestSettings};
use gigcal_backend::infrastructure::config::{Config, LogFormat};
use gigcal_backend::infrastructure::fetch::HttpCalendarFetcher;
use gigcal_backend::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting GigCal Backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(feeds = config.feeds.len(), "Feed configuration loaded");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("gigcal-backend/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let fetcher = Arc::new(HttpCalendarFetcher::new(http_client));

    let settings = Arc::new(IngestSettings {
        feeds: config.feeds.clone(),
        max_events_per_feed: config.max_events_per_feed,
        window: DateWindow::new(config.min_days_in_future, config.max_days_in_future),
        default_location: config.default_location.clone(),
    });

    let event_service = Arc::new(EventService::new(fetcher, settings));
    let events_controller = Arc::new(EventsController::new(event_service));

    // Start HTTP server with all routes
    start_http_server(config, events_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gigcal_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gigcal_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
