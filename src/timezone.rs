//! Zoned calendar resolution (pure, no wall-clock reads).
//!
//! Every component buckets events through this module so day and month
//! keys agree regardless of the zone the log store wrote its timestamps
//! in. Zone validity is a configuration concern settled at construction;
//! nothing here fails per call.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

/// Calendar parts of an instant in a specific zone.
///
/// `weekday` is 0=Sunday … 6=Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub weekday: u32,
}

impl ZonedParts {
    /// `YYYY-MM-DD`; lexicographic order matches chronological order.
    pub fn day_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `YYYY-MM`
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Resolve an absolute instant into calendar parts in `tz`.
pub fn zoned_parts(instant: DateTime<Utc>, tz: Tz) -> ZonedParts {
    let local = instant.with_timezone(&tz);
    ZonedParts {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
        weekday: local.weekday().num_days_from_sunday(),
    }
}

/// The local calendar date of an instant in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// `YYYY-MM-DD` key for a plain date.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zone_shifts_calendar_day() {
        // 23:30 UTC on June 1st is already June 2nd in Bangkok (UTC+7).
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap();
        let parts = zoned_parts(instant, chrono_tz::Asia::Bangkok);
        assert_eq!(parts.day_key(), "2025-06-02");
        assert_eq!(parts.hour, 6);
        assert_eq!(parts.minute, 30);
    }

    #[test]
    fn test_weekday_zero_is_sunday() {
        // 2025-08-03 is a Sunday; midnight UTC is 07:00 Bangkok, same date.
        let instant = Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap();
        let parts = zoned_parts(instant, chrono_tz::Asia::Bangkok);
        assert_eq!(parts.weekday, 0);
        // The following Saturday.
        let instant = Utc.with_ymd_and_hms(2025, 8, 9, 0, 0, 0).unwrap();
        assert_eq!(zoned_parts(instant, chrono_tz::Asia::Bangkok).weekday, 6);
    }

    #[test]
    fn test_month_key_pads() {
        let instant = Utc.with_ymd_and_hms(2025, 2, 3, 12, 0, 0).unwrap();
        let parts = zoned_parts(instant, chrono_tz::Asia::Bangkok);
        assert_eq!(parts.month_key(), "2025-02");
    }

    #[test]
    fn test_deterministic() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let a = zoned_parts(instant, chrono_tz::Asia::Bangkok);
        let b = zoned_parts(instant, chrono_tz::Asia::Bangkok);
        assert_eq!(a, b);
    }
}
