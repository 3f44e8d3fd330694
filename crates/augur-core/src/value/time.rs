//! Date and duration payloads.
//!
//! Both are thin wrappers over a millisecond count: dates are milliseconds
//! since the Unix epoch, durations a signed span. Durations render with the
//! largest unit that fits, which is what estimation output wants to show
//! (`3 hours`, not `10800000`).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::fmt_number;

/// A calendar date, stored as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateValue {
    ms: f64,
}

impl DateValue {
    /// Create a date from epoch milliseconds.
    pub fn from_ms(ms: f64) -> Self {
        Self { ms }
    }

    /// Create a date from a year/month/day triple.
    ///
    /// Returns `None` for out-of-range components (month 13, Feb 30, ...).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let ms = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
        Some(Self { ms: ms as f64 })
    }

    /// Epoch milliseconds.
    pub fn ms(&self) -> f64 {
        self.ms
    }

    /// The chrono view of this date, when the millisecond count is in
    /// chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ms as i64)
    }

    /// Shift this date by a duration.
    pub fn add(&self, duration: DurationValue) -> DateValue {
        DateValue::from_ms(self.ms + duration.ms())
    }

    /// The span from `other` to this date.
    pub fn difference(&self, other: DateValue) -> DurationValue {
        DurationValue::from_ms(self.ms - other.ms)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d")),
            None => write!(f, "Date({})", fmt_number(self.ms)),
        }
    }
}

/// A span of time, stored as signed milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationValue {
    ms: f64,
}

const SECOND_MS: f64 = 1000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
// Julian year, so that year arithmetic stays calendar-independent.
const YEAR_MS: f64 = 365.25 * DAY_MS;

impl DurationValue {
    pub fn from_ms(ms: f64) -> Self {
        Self { ms }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self { ms: seconds * SECOND_MS }
    }

    pub fn from_minutes(minutes: f64) -> Self {
        Self { ms: minutes * MINUTE_MS }
    }

    pub fn from_hours(hours: f64) -> Self {
        Self { ms: hours * HOUR_MS }
    }

    pub fn from_days(days: f64) -> Self {
        Self { ms: days * DAY_MS }
    }

    pub fn from_years(years: f64) -> Self {
        Self { ms: years * YEAR_MS }
    }

    pub fn ms(&self) -> f64 {
        self.ms
    }

    pub fn to_hours(&self) -> f64 {
        self.ms / HOUR_MS
    }

    pub fn to_days(&self) -> f64 {
        self.ms / DAY_MS
    }

    pub fn add(&self, other: DurationValue) -> DurationValue {
        DurationValue::from_ms(self.ms + other.ms)
    }

    pub fn scale(&self, factor: f64) -> DurationValue {
        DurationValue::from_ms(self.ms * factor)
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = [
            (YEAR_MS, "year"),
            (DAY_MS, "day"),
            (HOUR_MS, "hour"),
            (MINUTE_MS, "minute"),
            (SECOND_MS, "second"),
        ];

        for (unit_ms, name) in units {
            if self.ms.abs() >= unit_ms {
                let count = self.ms / unit_ms;
                let plural = if count == 1.0 { "" } else { "s" };
                return write!(f, "{} {}{}", fmt_number(count), name, plural);
            }
        }
        let plural = if self.ms == 1.0 { "" } else { "s" };
        write!(f, "{} millisecond{}", fmt_number(self.ms), plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_from_ymd() {
        let date = DateValue::from_ymd(1970, 1, 2).unwrap();
        assert_eq!(date.ms(), DAY_MS);
        assert_eq!(date.to_string(), "1970-01-02");
    }

    #[test]
    fn date_rejects_invalid_components() {
        assert!(DateValue::from_ymd(2024, 2, 30).is_none());
        assert!(DateValue::from_ymd(2024, 13, 1).is_none());
    }

    #[test]
    fn date_arithmetic() {
        let start = DateValue::from_ymd(2024, 5, 1).unwrap();
        let later = start.add(DurationValue::from_days(3.0));
        assert_eq!(later.to_string(), "2024-05-04");
        assert_eq!(later.difference(start), DurationValue::from_days(3.0));
    }

    #[test]
    fn duration_unit_constructors() {
        assert_eq!(DurationValue::from_minutes(2.0).ms(), 120_000.0);
        assert_eq!(DurationValue::from_hours(1.0).ms(), 3_600_000.0);
        assert_eq!(DurationValue::from_years(1.0).to_days(), 365.25);
    }

    #[test]
    fn duration_renders_largest_fitting_unit() {
        assert_eq!(DurationValue::from_hours(3.0).to_string(), "3 hours");
        assert_eq!(DurationValue::from_hours(1.0).to_string(), "1 hour");
        assert_eq!(DurationValue::from_minutes(90.0).to_string(), "1.5 hours");
        assert_eq!(DurationValue::from_days(730.5).to_string(), "2 years");
        assert_eq!(DurationValue::from_ms(12.0).to_string(), "12 milliseconds");
    }

    #[test]
    fn duration_arithmetic() {
        let d = DurationValue::from_hours(1.0).add(DurationValue::from_minutes(30.0));
        assert_eq!(d, DurationValue::from_minutes(90.0));
        assert_eq!(d.scale(2.0), DurationValue::from_hours(3.0));
    }
}
