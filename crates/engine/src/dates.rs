//! UTC calendar boundaries.
//!
//! Every range produced here is half-open (`[start, end)`) and anchored at
//! `00:00:00.000 UTC`. Bucketing never looks at any other timezone.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::{EngineError, ResultEngine};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn invalid_date(raw: &str, expected: &str) -> EngineError {
    EngineError::InvalidDate(format!("\"{raw}\" must be {expected}"))
}

/// Checks `raw` against a digit/dash pattern such as `dddd-dd`.
fn matches_shape(raw: &str, shape: &str) -> bool {
    raw.len() == shape.len()
        && raw.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'd' => c.is_ascii_digit(),
            other => c == other,
        })
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn parse_day(raw: &str) -> ResultEngine<NaiveDate> {
    let raw = raw.trim();
    if !matches_shape(raw, "dddd-dd-dd") {
        return Err(invalid_date(raw, "YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid_date(raw, "a calendar day"))
}

/// Instant at `00:00 UTC` of the given `YYYY-MM-DD` day.
pub fn utc_day_start(date: &str) -> ResultEngine<DateTime<Utc>> {
    parse_day(date).map(start_of)
}

/// Instant at `00:00 UTC` of the day after `YYYY-MM-DD`.
///
/// Used as the exclusive upper bound of date-range filters.
pub fn utc_day_start_next(date: &str) -> ResultEngine<DateTime<Utc>> {
    let day = parse_day(date)?;
    let next = day
        .succ_opt()
        .ok_or_else(|| invalid_date(date, "a representable day"))?;
    Ok(start_of(next))
}

/// `[day 1 of month, day 1 of month + 1)` in UTC. `month` is 1-based.
pub fn utc_month_range(year: i32, month: u32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let out_of_range = || EngineError::InvalidDate(format!("{year}-{month:02} is not a month"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(out_of_range)?;
    Ok((start_of(start), start_of(end)))
}

/// `[Jan 1 of year, Jan 1 of year + 1)` in UTC.
pub fn utc_year_range(year: i32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let out_of_range = || EngineError::InvalidDate(format!("{year} is not a supported year"));
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(out_of_range)?;
    Ok((start_of(start), start_of(end)))
}

/// Parses a strict 4 digit year token.
pub fn parse_year(raw: &str) -> ResultEngine<i32> {
    let raw = raw.trim();
    if !matches_shape(raw, "dddd") {
        return Err(invalid_date(raw, "YYYY"));
    }
    raw.parse().map_err(|_| invalid_date(raw, "YYYY"))
}

/// Parses the instant a movement occurred at.
///
/// Accepts RFC 3339 instants (any offset, normalized to UTC) or a bare
/// `YYYY-MM-DD` day, which maps to that day's `00:00 UTC`.
pub fn parse_occurred_at(raw: &str) -> ResultEngine<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    utc_day_start(raw).map_err(|_| invalid_date(raw, "an RFC 3339 instant or YYYY-MM-DD"))
}

/// A calendar month token (`YYYY-MM`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!(
                "{year}-{month:02} is not a month"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `instant` (UTC).
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// 1-based month.
    pub fn month(self) -> u32 {
        self.month
    }

    /// The immediately preceding calendar month (January rolls back to the
    /// previous December).
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn range(self) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        utc_month_range(self.year, self.month)
    }

    /// Human label, e.g. `January 2024`.
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if !matches_shape(raw, "dddd-dd") {
            return Err(invalid_date(raw, "YYYY-MM"));
        }
        let year: i32 = raw[..4].parse().map_err(|_| invalid_date(raw, "YYYY-MM"))?;
        let month: u32 = raw[5..].parse().map_err(|_| invalid_date(raw, "YYYY-MM"))?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
