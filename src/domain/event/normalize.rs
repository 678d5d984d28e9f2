use chrono::{DateTime, TimeZone, Utc};

use super::error::FeedError;
use super::model::{DecodedEvent, DecodedInstant, Event};

const UNTITLED_SUMMARY: &str = "Untitled Event";

/// Validate a decoded event and map it into the canonical shape.
///
/// Defaulting rules, in order: `uid` falls back to the component key,
/// `summary` to `"Untitled Event"`, a missing start time to `now`. A start
/// time that was present but could not be resolved rejects the event, as
/// does an empty uid or summary. Rejections are per-event; the caller logs
/// them and moves on.
///
/// `date`, `start` and `end` are formatted in `tz`; production callers pass
/// the serving process's local timezone.
pub fn normalize_event<Tz>(
    raw: DecodedEvent,
    fallback_location: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<Event, FeedError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let uid = match raw.uid {
        Some(uid) => uid,
        None => raw.key.clone(),
    };
    if uid.trim().is_empty() {
        return Err(FeedError::Validation(format!(
            "event {}: empty uid",
            raw.key
        )));
    }

    let title = match raw.summary {
        Some(summary) => summary,
        None => UNTITLED_SUMMARY.to_string(),
    };
    if title.trim().is_empty() {
        return Err(FeedError::Validation(format!(
            "event {}: empty summary",
            raw.key
        )));
    }

    let start = match raw.start {
        None => now,
        Some(DecodedInstant::Valid(instant)) => instant,
        Some(DecodedInstant::Invalid(value)) => {
            return Err(FeedError::Validation(format!(
                "event {}: unparseable start time {:?}",
                raw.key, value
            )));
        }
    };

    let local_start = start.with_timezone(tz);
    let date = local_start.format("%Y-%m-%d").to_string();
    let start_time = local_start.format("%H:%M").to_string();
    let end_time = raw
        .end
        .map(|end| end.with_timezone(tz).format("%H:%M").to_string());

    let location = match raw.location {
        Some(location) if !location.trim().is_empty() => location,
        _ => fallback_location.to_string(),
    };

    Ok(Event {
        uid,
        title,
        date,
        location,
        description: raw.description,
        start: Some(start_time),
        end: end_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn raw_event(key: &str) -> DecodedEvent {
        DecodedEvent {
            key: key.to_string(),
            uid: Some(format!("{key}@example.com")),
            summary: Some("Live at the basement".to_string()),
            description: None,
            location: None,
            start: Some(DecodedInstant::Valid(
                "2024-01-01T12:00:00Z".parse().unwrap(),
            )),
            end: None,
            url: None,
            status: None,
        }
    }

    fn utc_now() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_formats_date_and_time_in_given_zone() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let mut raw = raw_event("vevent-0");
        raw.end = Some("2024-01-01T14:30:00Z".parse().unwrap());

        let event = normalize_event(raw, "Test Feed", utc_now(), &plus_one).unwrap();

        assert_eq!(event.date, "2024-01-01");
        assert_eq!(event.start.as_deref(), Some("13:00"));
        assert_eq!(event.end.as_deref(), Some("15:30"));
    }

    #[test]
    fn test_date_rolls_over_across_midnight_in_local_zone() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let mut raw = raw_event("vevent-0");
        raw.start = Some(DecodedInstant::Valid(
            "2024-01-01T23:30:00Z".parse().unwrap(),
        ));

        let event = normalize_event(raw, "Test Feed", utc_now(), &plus_one).unwrap();

        assert_eq!(event.date, "2024-01-02");
        assert_eq!(event.start.as_deref(), Some("00:30"));
    }

    #[test]
    fn test_missing_location_defaults_to_feed_name() {
        let event = normalize_event(raw_event("vevent-0"), "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.location, "Test Feed");
    }

    #[test]
    fn test_blank_location_defaults_to_feed_name() {
        let mut raw = raw_event("vevent-0");
        raw.location = Some("   ".to_string());
        let event = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.location, "Test Feed");
    }

    #[test]
    fn test_present_location_is_kept() {
        let mut raw = raw_event("vevent-0");
        raw.location = Some("Monument, Stockholm".to_string());
        let event = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.location, "Monument, Stockholm");
    }

    #[test]
    fn test_missing_uid_falls_back_to_component_key() {
        let mut raw = raw_event("vevent-7");
        raw.uid = None;
        let event = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.uid, "vevent-7");
    }

    #[test]
    fn test_missing_summary_defaults_to_untitled() {
        let mut raw = raw_event("vevent-0");
        raw.summary = None;
        let event = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.title, "Untitled Event");
    }

    #[test]
    fn test_missing_start_uses_processing_time() {
        let mut raw = raw_event("vevent-0");
        raw.start = None;
        let event = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap();
        assert_eq!(event.date, "2024-01-01");
        assert_eq!(event.start.as_deref(), Some("00:00"));
    }

    #[test]
    fn test_unparseable_start_is_rejected() {
        let mut raw = raw_event("vevent-0");
        raw.start = Some(DecodedInstant::Invalid("not-a-date".to_string()));
        let err = normalize_event(raw, "Test Feed", utc_now(), &Utc).unwrap_err();
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_empty_uid_is_rejected() {
        let mut raw = raw_event("vevent-0");
        raw.uid = Some("  ".to_string());
        assert!(normalize_event(raw, "Test Feed", utc_now(), &Utc).is_err());
    }
}
