//! Working-range compliance figures
//!
//! Two figures come out of here: how long a device stayed inside its working
//! range, and whether it ever left the range for a sustained run of readings.

use crate::domain::device::WorkingRange;
use crate::domain::reading::Reading;
use nutype::nutype;
use serde::Serialize;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Nominal minutes between two ingested readings
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 1440),
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
pub struct SamplingInterval(u32);

impl SamplingInterval {
    /// Ingestion cadence of the deployed sensors
    pub fn three_minutes() -> Self {
        Self::try_new(3).expect("3 minutes is a valid sampling interval")
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self::three_minutes()
    }
}

/// Consecutive out-of-range readings that raise the warning note
#[nutype(
    validate(greater_or_equal = 1),
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
pub struct StreakLimit(usize);

impl StreakLimit {
    pub fn seven() -> Self {
        Self::try_new(7).expect("7 is a valid streak limit")
    }
}

impl Default for StreakLimit {
    fn default() -> Self {
        Self::seven()
    }
}

/// Time spent inside the working range, derived from reading counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct InRangeDuration {
    total_minutes: u64,
}

impl InRangeDuration {
    pub fn from_minutes(total_minutes: u64) -> Self {
        Self { total_minutes }
    }

    /// `count * interval`; assumes near-uniform sampling at the nominal cadence
    pub fn from_count(count: usize, interval: SamplingInterval) -> Self {
        Self::from_minutes(count as u64 * u64::from(interval.into_inner()))
    }

    pub fn total_minutes(&self) -> u64 {
        self.total_minutes
    }

    pub fn days(&self) -> u64 {
        self.total_minutes / MINUTES_PER_DAY
    }

    pub fn hours(&self) -> u64 {
        (self.total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR
    }

    pub fn minutes(&self) -> u64 {
        self.total_minutes % MINUTES_PER_HOUR
    }
}

/// Readings whose value lies inside the range (bounds inclusive)
pub fn count_in_range(readings: &[Reading], range: WorkingRange) -> usize {
    readings
        .iter()
        .filter(|reading| range.contains(reading.value))
        .count()
}

/// Index of the reading that completes the first out-of-range streak of
/// `limit` readings, scanning in time order
///
/// Later streaks are not reported: the warning is raised at most once.
pub fn find_out_of_range_streak(
    readings: &[Reading],
    range: WorkingRange,
    limit: StreakLimit,
) -> Option<usize> {
    let limit = limit.into_inner();
    let mut streak = 0usize;
    for (index, reading) in readings.iter().enumerate() {
        if range.contains(reading.value) {
            streak = 0;
        } else {
            streak += 1;
        }
        if streak == limit {
            return Some(index);
        }
    }
    None
}

/// Length of the longest run of consecutive out-of-range readings
pub fn longest_out_of_range_run(readings: &[Reading], range: WorkingRange) -> usize {
    readings
        .iter()
        .fold((0usize, 0usize), |(current, longest), reading| {
            if range.contains(reading.value) {
                (0, longest)
            } else {
                (current + 1, longest.max(current + 1))
            }
        })
        .1
}
