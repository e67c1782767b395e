// ledger/month.rs - Canonical "YYYY-MM" month keys
//
// Keys are derived once, when a record is created, and stored on the record.
// Months are 1-indexed in the key format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, TimeZone};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected YYYY-MM with month 01-12, got '{0}'")]
pub struct MonthKeyError(pub String);

/// A calendar month, the sole join key between records and monthly totals.
///
/// Internally this is the first day of the month, so ordering and
/// navigation come from chrono rather than hand-rolled arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthKey)
            .ok_or_else(|| MonthKeyError(format!("{}-{}", year, month)))
    }

    /// Month containing a calendar date
    pub fn of(date: NaiveDate) -> Self {
        MonthKey(date - Days::new(u64::from(date.day0())))
    }

    /// Month of a timestamp on the local calendar
    pub fn from_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> Self {
        Self::of(ts.with_timezone(&Local).date_naive())
    }

    /// Current month on the local calendar
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-indexed month number
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    /// Move forward (positive) or back (negative) by whole months
    pub fn shift(self, months: i32) -> Self {
        let delta = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(delta)
        } else {
            self.0.checked_sub_months(delta)
        };
        // chrono's range ends around year 262143; clamp rather than wrap
        shifted.map(MonthKey).unwrap_or(self)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthKeyError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_key_is_one_indexed_and_padded() {
        assert_eq!(MonthKey::of(date(2025, 3, 1)).to_string(), "2025-03");
        assert_eq!(MonthKey::of(date(2025, 12, 31)).to_string(), "2025-12");
        assert_eq!(MonthKey::of(date(2025, 1, 15)).to_string(), "2025-01");
    }

    #[test]
    fn test_navigation_crosses_years() {
        let jan: MonthKey = "2025-01".parse().unwrap();
        assert_eq!(jan.previous().to_string(), "2024-12");
        assert_eq!(jan.previous().next(), jan);

        let dec: MonthKey = "2024-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        assert_eq!(dec.shift(-14).to_string(), "2023-10");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["2025-13", "2025-00", "2025-3", "25-03", "2025/03", "", "abcd-ef", "2025-03-01"] {
            assert!(bad.parse::<MonthKey>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_contains_and_first_day() {
        let key: MonthKey = "2024-02".parse().unwrap();
        assert!(key.contains(date(2024, 2, 29)));
        assert!(!key.contains(date(2024, 3, 1)));
        assert_eq!(key.first_day(), date(2024, 2, 1));
    }

    #[test]
    fn test_timestamp_uses_local_calendar() {
        let now = Local::now();
        assert_eq!(MonthKey::from_timestamp(&now), MonthKey::of(now.date_naive()));
        assert_eq!(MonthKey::from_timestamp(&now.with_timezone(&chrono::Utc)), MonthKey::of(now.date_naive()));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-03\"");
        let back: MonthKey = serde_json::from_str("\"2025-03\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"2025-3\"").is_err());
    }
}
