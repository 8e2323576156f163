//! Local calendar math: the current month window and week starts.
//!
//! The site runs on one fixed local offset. Every window is computed in
//! that offset and converted back to UTC instants for querying.

use crate::types::Timestamp;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

/// Date format used for week keys and `YYYY-MM-DD` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
pub struct LocalCalendar {
    offset: FixedOffset,
}

/// Half-open `[start, end)` month window, both as UTC instants and as
/// local dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: Timestamp,
    pub end: Timestamp,
    pub first_day: NaiveDate,
    pub next_first_day: NaiveDate,
}

impl LocalCalendar {
    /// Offsets outside ±24h fall back to UTC; config validation keeps
    /// real values within ±14h.
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn local_date(&self, now: Timestamp) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Local midnight of `date` as a UTC instant.
    pub fn midnight_utc(&self, date: NaiveDate) -> Timestamp {
        let local = date.and_time(NaiveTime::default());
        (local - Duration::seconds(i64::from(self.offset.local_minus_utc())))
            .and_utc()
    }

    pub fn current_month(&self, now: Timestamp) -> MonthWindow {
        let first_day = first_of_month(self.local_date(now));
        let next_first_day = first_of_month(first_day + Duration::days(32));
        MonthWindow {
            start: self.midnight_utc(first_day),
            end: self.midnight_utc(next_first_day),
            first_day,
            next_first_day,
        }
    }

    /// The Sunday that starts the next calendar week. On a Sunday this is
    /// seven days out, since the current week began today.
    pub fn next_week_start(&self, now: Timestamp) -> NaiveDate {
        let today = self.local_date(now);
        let days_ahead = 7 - i64::from(today.weekday().num_days_from_sunday());
        today + Duration::days(days_ahead)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn at(s: &str) -> Timestamp {
        chrono::DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn next_week_start_is_following_sunday() {
        let cal = LocalCalendar::new(0);
        // Monday 2026-10-19
        let next = cal.next_week_start(at("2026-10-19T12:00:00Z"));
        assert_eq!(format_date(next), "2026-10-25");
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn sunday_rolls_a_full_week() {
        let cal = LocalCalendar::new(0);
        let next = cal.next_week_start(at("2026-10-25T00:00:00Z"));
        assert_eq!(format_date(next), "2026-11-01");
    }

    #[test]
    fn offset_shifts_local_date() {
        // Saturday 23:30 UTC is already Sunday in UTC+2.
        let cal = LocalCalendar::new(120);
        let next = cal.next_week_start(at("2026-10-24T23:30:00Z"));
        assert_eq!(format_date(next), "2026-11-01");
    }

    #[test]
    fn december_window_crosses_year() {
        let cal = LocalCalendar::new(0);
        let w = cal.current_month(at("2026-12-15T08:00:00Z"));
        assert_eq!(format_date(w.first_day), "2026-12-01");
        assert_eq!(format_date(w.next_first_day), "2027-01-01");
        assert_eq!(w.start, at("2026-12-01T00:00:00Z"));
        assert_eq!(w.end, at("2027-01-01T00:00:00Z"));
    }

    #[test]
    fn negative_offset_month_start_in_utc() {
        // UTC-5: local midnight Oct 1 is 05:00 UTC.
        let cal = LocalCalendar::new(-300);
        let w = cal.current_month(at("2026-10-19T12:00:00Z"));
        assert_eq!(w.start, at("2026-10-01T05:00:00Z"));
    }

    #[test]
    fn extreme_offset_falls_back_to_utc() {
        let now = at("2026-10-24T23:30:00Z");
        for minutes in [i32::MAX, i32::MIN, 25 * 60] {
            let cal = LocalCalendar::new(minutes);
            assert_eq!(cal.local_date(now), NaiveDate::from_ymd_opt(2026, 10, 24).unwrap());
        }
    }
}
