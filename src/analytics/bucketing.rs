//! Calendar-day and sub-day partitioning of reading series
//!
//! Day boundaries follow the device's operating time zone, never UTC, so a
//! reading taken at 23:30 local time lands on the local calendar day even when
//! its UTC timestamp already belongs to the next date.

use crate::domain::reading::Reading;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Length of one sub-day period in hours
pub const PERIOD_HOURS: u32 = 4;

/// One of the six fixed 4-hour intervals of a local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayPeriod {
    Hours00To04,
    Hours04To08,
    Hours08To12,
    Hours12To16,
    Hours16To20,
    Hours20To24,
}

impl DayPeriod {
    /// All periods in chronological order
    pub const ALL: [DayPeriod; 6] = [
        DayPeriod::Hours00To04,
        DayPeriod::Hours04To08,
        DayPeriod::Hours08To12,
        DayPeriod::Hours12To16,
        DayPeriod::Hours16To20,
        DayPeriod::Hours20To24,
    ];

    /// Period containing a local hour of day (0..=23)
    pub fn from_hour(hour: u32) -> Self {
        match hour / PERIOD_HOURS {
            0 => Self::Hours00To04,
            1 => Self::Hours04To08,
            2 => Self::Hours08To12,
            3 => Self::Hours12To16,
            4 => Self::Hours16To20,
            _ => Self::Hours20To24,
        }
    }

    /// Zero-based position within the day
    pub fn index(&self) -> usize {
        match self {
            Self::Hours00To04 => 0,
            Self::Hours04To08 => 1,
            Self::Hours08To12 => 2,
            Self::Hours12To16 => 3,
            Self::Hours16To20 => 4,
            Self::Hours20To24 => 5,
        }
    }

    /// Column heading used on the printed grid
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hours00To04 => "0-4h",
            Self::Hours04To08 => "4-8h",
            Self::Hours08To12 => "8-12h",
            Self::Hours12To16 => "12-16h",
            Self::Hours16To20 => "16-20h",
            Self::Hours20To24 => "20-0h",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Readings of one local calendar day, split by period
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayBucket {
    periods: BTreeMap<DayPeriod, Vec<Reading>>,
}

impl DayBucket {
    fn push(&mut self, period: DayPeriod, reading: Reading) {
        self.periods.entry(period).or_default().push(reading);
    }

    /// Readings of one period, empty when the period had no samples
    pub fn period(&self, period: DayPeriod) -> &[Reading] {
        self.periods.get(&period).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty periods in chronological order
    pub fn periods(&self) -> impl Iterator<Item = (DayPeriod, &[Reading])> {
        self.periods
            .iter()
            .map(|(period, readings)| (*period, readings.as_slice()))
    }

    /// All readings of the day in chronological order
    pub fn readings(&self) -> impl Iterator<Item = &Reading> {
        self.periods.values().flatten()
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings().map(|reading| reading.value).collect()
    }

    pub fn len(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assigns readings to `(day, period)` buckets in a fixed time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucketing {
    time_zone: Tz,
}

impl TimeBucketing {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Local calendar date of an instant
    pub fn day_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.time_zone).date_naive()
    }

    /// Local 4-hour period of an instant
    pub fn period_of(&self, timestamp: DateTime<Utc>) -> DayPeriod {
        DayPeriod::from_hour(timestamp.with_timezone(&self.time_zone).hour())
    }

    /// Partition readings into day buckets; every reading lands in exactly one
    /// `(day, period)` slot
    pub fn partition<'a>(
        &self,
        readings: impl IntoIterator<Item = &'a Reading>,
    ) -> BTreeMap<NaiveDate, DayBucket> {
        let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for reading in readings {
            let local = reading.timestamp.with_timezone(&self.time_zone);
            days.entry(local.date_naive())
                .or_default()
                .push(DayPeriod::from_hour(local.hour()), *reading);
        }
        days
    }
}
