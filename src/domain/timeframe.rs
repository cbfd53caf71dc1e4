//! Chart range and bar interval selections.

use chrono::{Datelike, Duration, Months, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// How far back from the latest bar a chart reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartRange {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl ChartRange {
    pub const ALL: [ChartRange; 6] = [
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::TwoYears,
        ChartRange::FiveYears,
    ];

    pub fn months(self) -> u32 {
        match self {
            ChartRange::OneMonth => 1,
            ChartRange::ThreeMonths => 3,
            ChartRange::SixMonths => 6,
            ChartRange::OneYear => 12,
            ChartRange::TwoYears => 24,
            ChartRange::FiveYears => 60,
        }
    }

    /// Earliest timestamp covered when the range ends at `latest`.
    pub fn start_from(self, latest: NaiveDateTime) -> NaiveDateTime {
        latest
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDateTime::MIN)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChartRange::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| format!("unknown range '{}' (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)", s))
    }
}

/// Bar width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    Hour,
    #[default]
    Day,
    Week,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Day, Interval::Week, Interval::Hour];

    /// Start of the bucket containing `ts`. Weeks start on Monday.
    pub fn bucket_start(self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Interval::Hour => ts
                .date()
                .and_time(NaiveTime::MIN)
                .with_hour(ts.hour())
                .unwrap_or(ts),
            Interval::Day => ts.date().and_time(NaiveTime::MIN),
            Interval::Week => {
                let date = ts.date();
                let offset = date.weekday().num_days_from_monday() as i64;
                (date - Duration::days(offset)).and_time(NaiveTime::MIN)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Hour => "1h",
            Interval::Day => "1d",
            Interval::Week => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| format!("unknown interval '{}' (expected 1d, 1wk or 1h)", s))
    }
}
