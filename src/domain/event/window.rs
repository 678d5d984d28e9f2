use chrono::{DateTime, Duration, Utc};

/// Admission window for event start times, in whole days relative to "now".
///
/// An event passes iff `now + min_days <= start <= now + max_days`, both
/// bounds inclusive. `min_days` of 0 excludes past events.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
    min_days: i64,
    max_days: i64,
}

impl DateWindow {
    pub fn new(min_days: i64, max_days: i64) -> Self {
        Self { min_days, max_days }
    }

    pub fn contains(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let min_date = now + Duration::days(self.min_days);
        let max_date = now + Duration::days(self.max_days);
        start >= min_date && start <= max_date
    }
}
