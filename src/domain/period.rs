//! Calendar period covered by a report

use crate::analytics::compliance::SamplingInterval;
use crate::error::{ReportError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use derive_more::Display;
use nutype::nutype;
use serde::Serialize;

/// Longest allowed distance, in days, between a report's start and end dates
#[nutype(
    validate(greater_or_equal = 0, less_or_equal = 14),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        Display
    )
)]
pub struct MaxPeriodDays(i64);

impl MaxPeriodDays {
    /// Two weeks, the regulatory maximum for one document
    pub fn two_weeks() -> Self {
        Self::try_new(14).expect("14 days is a valid maximum period")
    }
}

impl Default for MaxPeriodDays {
    fn default() -> Self {
        Self::two_weeks()
    }
}

/// Why a date range was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PeriodViolation {
    #[display("end date precedes start date")]
    EndBeforeStart,
    #[display("spans {days} days, the maximum is {max}")]
    ExceedsMaximum { days: i64, max: i64 },
}

/// Validated inclusive date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// Validate `0 <= end - start <= max_span` days
    pub fn new(start: NaiveDate, end: NaiveDate, max_span: MaxPeriodDays) -> Result<Self> {
        let days = (end - start).num_days();
        let violation = if days < 0 {
            Some(PeriodViolation::EndBeforeStart)
        } else if days > max_span.into_inner() {
            Some(PeriodViolation::ExceedsMaximum {
                days,
                max: max_span.into_inner(),
            })
        } else {
            None
        };

        match violation {
            Some(violation) => Err(ReportError::InvalidPeriod {
                start,
                end,
                violation,
            }),
            None => Ok(Self { start, end }),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Calendar days between start and end (0 for a single-day report)
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Inclusive number of calendar days, one grid row each
    pub fn number_of_days(&self) -> usize {
        self.span_days() as usize + 1
    }

    /// Every calendar day of the period in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.number_of_days())
    }

    /// UTC instants bounding the readings that belong to this period
    ///
    /// Runs from local midnight of the start date to local midnight after the
    /// end date minus one sampling interval, i.e. the timestamp of the last
    /// nominal sample of the final day.
    pub fn reading_window(
        &self,
        time_zone: Tz,
        sampling_interval: SamplingInterval,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = local_midnight(self.start, time_zone);
        let after_end = local_midnight(self.end + Duration::days(1), time_zone);
        let to = after_end - Duration::minutes(i64::from(sampling_interval.into_inner()));
        (from, to)
    }
}

/// First instant of `date` in `time_zone`, skipping forward over a DST gap
fn local_midnight(date: NaiveDate, time_zone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    time_zone
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            time_zone
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
