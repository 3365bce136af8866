//! Statistics and compliance figures derived from a reading series
//!
//! The [`AnalyticsEngine`] is the single entry point used by the report
//! assembler. It buckets readings by local day and 4-hour period, summarises
//! each day, and evaluates the series against the device's working range.

pub mod bucketing;
pub mod compliance;
pub mod format;
pub mod statistics;

pub use bucketing::{DayBucket, DayPeriod, TimeBucketing};
pub use compliance::{InRangeDuration, SamplingInterval, StreakLimit};
pub use statistics::{DayStatistics, Summary};

use crate::domain::device::WorkingRange;
use crate::domain::reading::Reading;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the report prints about a reading series
#[derive(Debug, Clone, PartialEq)]
pub struct ReportAnalytics {
    pub overall_mean: f64,
    /// Days with at least one reading, keyed by local calendar date
    pub daily: BTreeMap<NaiveDate, DayStatistics>,
    pub in_range: InRangeDuration,
    /// Position of the reading completing the first sustained excursion
    pub excursion_at: Option<usize>,
    pub longest_excursion: usize,
}

impl ReportAnalytics {
    pub fn day(&self, date: NaiveDate) -> Option<&DayStatistics> {
        self.daily.get(&date)
    }

    /// Whether the out-of-range warning note applies
    pub fn has_sustained_excursion(&self) -> bool {
        self.excursion_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEngine {
    bucketing: TimeBucketing,
    sampling_interval: SamplingInterval,
    streak_limit: StreakLimit,
}

impl AnalyticsEngine {
    pub fn new(time_zone: Tz, sampling_interval: SamplingInterval, streak_limit: StreakLimit) -> Self {
        Self {
            bucketing: TimeBucketing::new(time_zone),
            sampling_interval,
            streak_limit,
        }
    }

    pub fn bucketing(&self) -> &TimeBucketing {
        &self.bucketing
    }

    pub fn sampling_interval(&self) -> SamplingInterval {
        self.sampling_interval
    }

    pub fn streak_limit(&self) -> StreakLimit {
        self.streak_limit
    }

    /// Mean of all reading values, `0.0` when there are none
    pub fn mean(&self, readings: &[Reading]) -> f64 {
        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        statistics::mean(&values)
    }

    /// Per-day statistics for every day that has readings
    pub fn daily_statistics(&self, readings: &[Reading]) -> BTreeMap<NaiveDate, DayStatistics> {
        self.bucketing
            .partition(readings)
            .iter()
            .filter_map(|(date, bucket)| {
                DayStatistics::from_bucket(*date, bucket).map(|stats| (*date, stats))
            })
            .collect()
    }

    pub fn in_range_duration(&self, readings: &[Reading], range: WorkingRange) -> InRangeDuration {
        InRangeDuration::from_count(
            compliance::count_in_range(readings, range),
            self.sampling_interval,
        )
    }

    /// Run every analysis over a time-ordered series
    pub fn analyze(&self, readings: &[Reading], range: WorkingRange) -> ReportAnalytics {
        let analytics = ReportAnalytics {
            overall_mean: self.mean(readings),
            daily: self.daily_statistics(readings),
            in_range: self.in_range_duration(readings, range),
            excursion_at: compliance::find_out_of_range_streak(readings, range, self.streak_limit),
            longest_excursion: compliance::longest_out_of_range_run(readings, range),
        };

        debug!(
            readings = readings.len(),
            days = analytics.daily.len(),
            in_range_minutes = analytics.in_range.total_minutes(),
            longest_excursion = analytics.longest_excursion,
            "Analysed reading series"
        );

        analytics
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(
            chrono_tz::America::Sao_Paulo,
            SamplingInterval::default(),
            StreakLimit::default(),
        )
    }
}
