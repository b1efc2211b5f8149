use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Months, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::prelude::*;

/// Time zone in which the requested dates are interpreted and the prices are reported.
pub const REFERENCE_TIME_ZONE: Tz = chrono_tz::Europe::Brussels;

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Tz>,

    /// Exclusive.
    pub end: DateTime<Tz>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    /// Interval between midnights of the dates in the reference time zone.
    pub fn try_from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start < end, "the start date `{start}` must be before the end date `{end}`");
        Ok(Self::new(local_midnight(start)?, local_midnight(end)?))
    }

    #[must_use]
    pub fn contains(self, other: DateTime<Tz>) -> bool {
        (self.start <= other) && (other < self.end)
    }

    /// Split the interval into consecutive chunks of at most one year.
    pub fn split_by_year(self) -> Result<Vec<Self>> {
        let mut chunks = Vec::new();
        let mut start = self.start;
        while start < self.end {
            let end = start
                .checked_add_months(Months::new(12))
                .context("the interval end is out of range")?
                .min(self.end);
            chunks.push(Self::new(start, end));
            start = end;
        }
        Ok(chunks)
    }
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Tz>> {
    REFERENCE_TIME_ZONE
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .with_context(|| format!("`{date}` has no midnight in {REFERENCE_TIME_ZONE}"))
}
