use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::domain::event::FeedSource;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Feed ingestion
    pub feeds: Vec<FeedSource>,
    pub max_events_per_feed: usize,
    pub max_days_in_future: i64,
    pub min_days_in_future: i64,
    /// Advisory only; date formatting uses the serving process's local zone.
    pub default_timezone: String,
    /// Overrides the feed-name location fallback when set (legacy behavior
    /// used "TBA").
    pub default_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// On-disk shape of the feeds file (TOML, `[[feeds]]` tables)
#[derive(Debug, Deserialize)]
struct FeedsFile {
    feeds: Vec<FeedSource>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let feeds_file = env::var("FEEDS_FILE").unwrap_or_else(|_| "feeds.toml".to_string());
        let feeds = load_feeds(Path::new(&feeds_file))?;

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            feeds,
            max_events_per_feed: env::var("MAX_EVENTS_PER_FEED")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,
            max_days_in_future: env::var("MAX_DAYS_IN_FUTURE")
                .unwrap_or_else(|_| "365".to_string())
                .parse()?,
            min_days_in_future: env::var("MIN_DAYS_IN_FUTURE")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
            default_timezone: env::var("DEFAULT_TIMEZONE")
                .unwrap_or_else(|_| "Europe/Stockholm".to_string()),
            default_location: env::var("DEFAULT_LOCATION").ok(),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn load_feeds(path: &Path) -> Result<Vec<FeedSource>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read feeds file {}: {e}", path.display()))?;
    let file: FeedsFile = toml::from_str(&raw)?;
    Ok(file.feeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_feeds_file() {
        let raw = r#"
            [[feeds]]
            name = "Monument"
            url = "https://www.monument031.com/?post_type=tribe_events&ical=1"

            [[feeds]]
            name = "Warehouse"
            url = "https://warehouse.example.com/events.ics"
        "#;
        let file: FeedsFile = toml::from_str(raw).unwrap();
        assert_eq!(file.feeds.len(), 2);
        assert_eq!(file.feeds[0].name, "Monument");
        assert!(file.feeds[1].url.ends_with(".ics"));
    }

    #[test]
    fn test_feeds_file_without_entries_is_rejected() {
        assert!(toml::from_str::<FeedsFile>("").is_err());
    }
}
