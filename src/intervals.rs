use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Granularity of one balance-history interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl IntervalPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalPeriod::Hour => "hour",
            IntervalPeriod::Day => "day",
            IntervalPeriod::Week => "week",
            IntervalPeriod::Month => "month",
            IntervalPeriod::Year => "year",
        }
    }
}

impl FromStr for IntervalPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(IntervalPeriod::Hour),
            "day" => Ok(IntervalPeriod::Day),
            "week" => Ok(IntervalPeriod::Week),
            "month" => Ok(IntervalPeriod::Month),
            "year" => Ok(IntervalPeriod::Year),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown interval period: {}",
                other
            )))),
        }
    }
}

/// Start of UNIX time, the anchor for users without any transaction history.
pub const EPOCH: NaiveDateTime = NaiveDateTime::UNIX_EPOCH;

/// Generates the boundary timestamps for `count` intervals ending at `until`.
///
/// The result has `count + 2` entries: index 0 is the start of UNIX time
/// (the synthetic all-time-before-range interval), indices `1..=count + 1`
/// are each exactly one period before the next, with the last entry equal to
/// `until`. Month and year steps use calendar arithmetic; hour, day and week
/// steps are fixed-length. The anchor is always supplied by the caller, never
/// read from the wall clock, so the same inputs yield the same boundaries.
pub fn boundaries(
    period: IntervalPeriod,
    count: usize,
    until: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>> {
    let mut edges = vec![EPOCH; count + 2];
    edges[count + 1] = until;
    for i in (1..=count).rev() {
        edges[i] = previous_boundary(period, edges[i + 1])?;
    }
    Ok(edges)
}

fn previous_boundary(period: IntervalPeriod, next: NaiveDateTime) -> Result<NaiveDateTime> {
    let previous = match period {
        IntervalPeriod::Hour => next.checked_sub_signed(Duration::hours(1)),
        IntervalPeriod::Day => next.checked_sub_signed(Duration::days(1)),
        IntervalPeriod::Week => next.checked_sub_signed(Duration::weeks(1)),
        IntervalPeriod::Month => next.checked_sub_months(Months::new(1)),
        IntervalPeriod::Year => next.checked_sub_months(Months::new(12)),
    };
    previous.ok_or_else(|| {
        Error::Validation(ValidationError::DateOutOfRange(format!(
            "no {} boundary before {}",
            period.as_str(),
            next
        )))
    })
}

/// Number of whole calendar months since January 1970. Two dates fall in the
/// same month iff their identifiers are equal, which is what the replay uses
/// to count elapsed months between transactions.
pub fn month_identifier(date: NaiveDateTime) -> i32 {
    (date.year() - 1970) * 12 + date.month0() as i32
}
