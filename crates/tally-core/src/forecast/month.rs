//! UTC calendar month keys (`YYYY-MM`)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::models::DateRange;

/// A calendar month, always anchored at its first day.
///
/// Ordering is chronological, which matches the lexical order of the
/// zero-padded key for four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Parse a strict `YYYY-MM` key. A single-digit month is accepted and
    /// normalized (`2024-3` becomes `2024-03`).
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth(input.to_string());

        let (year_str, month_str) = input.split_once('-').ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if year_str.len() != 4 || !digits(year_str) {
            return Err(invalid());
        }
        if month_str.len() > 2 || !digits(month_str) {
            return Err(invalid());
        }

        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        if year == 0 || !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Self::new(year, month).ok_or_else(invalid)
    }

    /// The UTC month containing `ts`
    pub fn from_datetime(ts: DateTime<Utc>) -> Self {
        let date = ts.date_naive();
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The following calendar month, rolling December into January
    pub fn next(&self) -> Option<Self> {
        let (year, month) = if self.month() == 12 {
            (self.year().checked_add(1)?, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        Self::new(year, month)
    }

    /// Day before the next month's first day, so leap years come from chrono
    pub fn days_in_month(&self) -> u32 {
        match self.next().and_then(|next| next.0.pred_opt()) {
            Some(last_day) => last_day.day(),
            // Only December of chrono's last year has no successor
            None => 31,
        }
    }

    /// 00:00:00.000 UTC on the first day
    pub fn first_instant(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// 23:59:59.999 UTC on the last day
    pub fn last_instant(&self) -> DateTime<Utc> {
        let last_day = self.0 + Duration::days(i64::from(self.days_in_month() - 1));
        last_day.and_time(NaiveTime::MIN).and_utc() + Duration::milliseconds(86_399_999)
    }

    /// Inclusive range covering the whole month
    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_instant(), self.last_instant())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
