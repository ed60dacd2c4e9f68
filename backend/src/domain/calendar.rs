//! # Calendar
//!
//! Local-time helpers shared by the services. "Now" comes from an injected
//! [`Clock`] and "local" means the configured fixed UTC offset, so every
//! date-dependent computation can be pinned in tests.
//!
//! Timestamps are persisted as RFC 3339 UTC strings with millisecond
//! precision (`2024-01-15T08:00:00.000Z`). That format sorts
//! lexicographically, which the SQLite range queries rely on.

use std::sync::Arc;

use anyhow::Context;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    Utc,
};
use mockable::Clock;

use super::error::{DomainError, DomainResult};

pub type SharedClock = Arc<dyn Clock + Send + Sync>;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct LocalCalendar {
    clock: SharedClock,
    offset: FixedOffset,
}

impl LocalCalendar {
    pub fn new(clock: SharedClock, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// The current local calendar day
    pub fn today(&self) -> NaiveDate {
        self.local_date_of(self.now())
    }

    pub fn local_date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// 1-based day of the year for today
    pub fn day_of_year(&self) -> u32 {
        self.today().ordinal()
    }

    /// UTC instant of local midnight starting `date`
    pub fn start_of_day(&self, date: NaiveDate) -> DomainResult<DateTime<Utc>> {
        self.local_to_utc(date.and_time(NaiveTime::MIN))
    }

    /// Inclusive bounds of a local day: `[midnight, midnight + 24h - 1ms]`.
    /// The next day's midnight belongs to the next day only.
    pub fn day_bounds(&self, date: NaiveDate) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.start_of_day(date)?;
        let end = start
            .checked_add_signed(Duration::hours(24) - Duration::milliseconds(1))
            .ok_or_else(|| out_of_range(date))?;
        Ok((start, end))
    }

    fn local_to_utc(&self, local: NaiveDateTime) -> DomainResult<DateTime<Utc>> {
        let utc = local
            .checked_sub_signed(Duration::seconds(i64::from(self.offset.local_minus_utc())))
            .ok_or_else(|| out_of_range(local))?;
        Ok(DateTime::from_naive_utc_and_offset(utc, Utc))
    }

    /// Parse a client-supplied instant. Accepts RFC 3339, a naive local
    /// `YYYY-MM-DDTHH:MM:SS`, or a bare date meaning local midnight.
    pub fn parse_timestamp(&self, value: &str) -> DomainResult<DateTime<Utc>> {
        let value = value.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(instant.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return self.local_to_utc(naive);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
            return self.start_of_day(date);
        }

        Err(DomainError::validation(format!(
            "Invalid timestamp '{}': expected an ISO 8601 date or date-time",
            value
        )))
    }

    /// Parse a client-supplied timestamp that must not lie in the future
    pub fn parse_past_timestamp(&self, value: &str, field: &str) -> DomainResult<DateTime<Utc>> {
        let instant = self.parse_timestamp(value)?;
        if instant > self.now() {
            return Err(DomainError::validation(format!("{} cannot be in the future", field)));
        }
        Ok(instant)
    }

    /// Resolve a `?date=` value to a local day. Absent means today; a full
    /// timestamp selects the local day it falls on.
    pub fn parse_day(&self, value: Option<&str>) -> DomainResult<NaiveDate> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(self.today()),
            Some(v) => match NaiveDate::parse_from_str(v, DATE_FORMAT) {
                Ok(date) => Ok(date),
                Err(_) => self.parse_timestamp(v).map(|instant| self.local_date_of(instant)),
            },
        }
    }
}

fn out_of_range(value: impl std::fmt::Display) -> DomainError {
    DomainError::validation(format!("Date {} is outside the supported range", value))
}

pub fn parse_date(value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::validation(format!("Invalid date '{}': expected YYYY-MM-DD", value))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp read back from storage
pub fn parse_stored_timestamp(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Corrupt stored timestamp: {}", value))?
        .with_timezone(&Utc))
}

pub fn parse_stored_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("Corrupt stored date: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixed_calendar;
    use chrono::TimeZone;

    #[test]
    fn test_today_follows_offset() {
        // 02:30 UTC is still the previous evening five hours west
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();
        assert_eq!(fixed_calendar(now, 0).today(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(fixed_calendar(now, -300).today(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_day_bounds_cover_one_local_day() {
        let calendar = fixed_calendar(Utc::now(), 60);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, end) = calendar.day_bounds(date).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 14, 23, 0, 0).unwrap());
        assert_eq!(end - start, Duration::hours(24) - Duration::milliseconds(1));
        let (next_start, _) = calendar.day_bounds(date.succ_opt().unwrap()).unwrap();
        assert!(next_start > end);
    }

    #[test]
    fn test_extreme_dates_are_rejected_not_overflowed() {
        let west = fixed_calendar(Utc::now(), -60);
        let east = fixed_calendar(Utc::now(), 60);

        let last_day = west.parse_day(Some("+262142-12-31")).unwrap();
        assert!(matches!(west.day_bounds(last_day), Err(DomainError::Validation(_))));
        assert!(matches!(
            west.parse_timestamp("+262142-12-31T23:59:59"),
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(east.day_bounds(NaiveDate::MIN), Err(DomainError::Validation(_))));
        assert!(matches!(
            east.local_to_utc(NaiveDate::MIN.and_time(NaiveTime::MIN)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let calendar = fixed_calendar(Utc::now(), 120);

        assert_eq!(
            calendar.parse_timestamp("2024-01-15T08:00:00Z").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
        );
        assert_eq!(
            calendar.parse_timestamp("2024-01-15T08:00:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
        );
        assert_eq!(
            calendar.parse_timestamp("2024-01-15").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 14, 22, 0, 0).unwrap()
        );
        assert!(matches!(
            calendar.parse_timestamp("yesterday"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_past_timestamp_rejects_future() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let calendar = fixed_calendar(now, 0);

        assert!(calendar.parse_past_timestamp("2024-01-15T11:59:59Z", "achievedAt").is_ok());
        assert!(calendar.parse_past_timestamp("2024-01-15", "achievedAt").is_ok());
        assert!(calendar.parse_past_timestamp("2024-01-15T12:00:01Z", "achievedAt").is_err());
    }

    #[test]
    fn test_parse_day() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
        let calendar = fixed_calendar(now, 60);

        assert_eq!(calendar.parse_day(None).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(
            calendar.parse_day(Some("2023-12-31")).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert_eq!(
            calendar.parse_day(Some("2024-01-15T23:30:00Z")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
        assert!(calendar.parse_day(Some("15/01/2024")).is_err());
    }

    #[test]
    fn test_timestamp_format_round_trips_and_sorts() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let later = earlier + Duration::milliseconds(5);
        let (a, b) = (format_timestamp(&earlier), format_timestamp(&later));

        assert_eq!(a, "2024-01-15T08:00:00.000Z");
        assert!(a < b);
        assert_eq!(parse_stored_timestamp(&b).unwrap(), later);
    }
}
