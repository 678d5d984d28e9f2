//! iCalendar decoding on top of the icalendar crate's parser.

use chrono::{DateTime, Local, TimeZone, Utc};
use icalendar::parser::{read_calendar, unfold, Component};
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::domain::event::{DecodedCalendar, DecodedEvent, DecodedInstant, EventStatus, FeedError};

/// Decode raw calendar text into events plus calendar metadata.
///
/// Only VEVENT components are extracted. The calendar name comes from the
/// top-level PRODID and the timezone from the VTIMEZONE component's TZID,
/// both absent when not present. Fails with a parse-kind error when the
/// input is not valid iCalendar text.
pub fn decode_calendar(raw: &str) -> Result<DecodedCalendar, FeedError> {
    let unfolded = unfold(raw);
    let calendar = read_calendar(&unfolded).map_err(|e| FeedError::Parse(e.to_string()))?;

    let calendar_name = calendar
        .properties
        .iter()
        .find(|p| p.name == "PRODID")
        .map(|p| p.val.to_string());
    let timezone = calendar
        .components
        .iter()
        .find(|c| c.name == "VTIMEZONE")
        .and_then(|c| c.find_prop("TZID"))
        .map(|p| p.val.to_string());

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .enumerate()
        .map(|(index, component)| decode_event(component, index))
        .collect();

    Ok(DecodedCalendar {
        events,
        calendar_name,
        timezone,
    })
}

fn decode_event(component: &Component<'_>, index: usize) -> DecodedEvent {
    let start = component.find_prop("DTSTART").map(|prop| {
        match DatePerhapsTime::try_from(prop).ok().and_then(resolve_instant) {
            Some(instant) => DecodedInstant::Valid(instant),
            None => DecodedInstant::Invalid(prop.val.to_string()),
        }
    });
    let end = component
        .find_prop("DTEND")
        .and_then(|prop| DatePerhapsTime::try_from(prop).ok())
        .and_then(resolve_instant);

    let status = component
        .find_prop("STATUS")
        .map(|prop| match prop.val.as_ref() {
            "TENTATIVE" => EventStatus::Tentative,
            "CANCELLED" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        });

    DecodedEvent {
        key: format!("vevent-{index}"),
        uid: component.find_prop("UID").map(|p| p.val.to_string()),
        summary: component.find_prop("SUMMARY").map(|p| p.val.to_string()),
        description: component
            .find_prop("DESCRIPTION")
            .map(|p| p.val.to_string()),
        location: component.find_prop("LOCATION").map(|p| p.val.to_string()),
        start,
        end,
        url: component.find_prop("URL").map(|p| p.val.to_string()),
        status,
    }
}

/// Resolve a parsed date-or-datetime to a UTC instant.
///
/// Date-only and floating values resolve in the serving process's local
/// zone; TZID-qualified values resolve through chrono-tz. Unresolvable
/// values (unknown TZID, nonexistent local time) yield `None`.
fn resolve_instant(value: DatePerhapsTime) -> Option<DateTime<Utc>> {
    match value {
        DatePerhapsTime::Date(date) => Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(instant)) => Some(instant),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: chrono_tz::Tz = tzid.parse().ok()?;
            tz.from_local_datetime(&date_time)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
