//! Descriptive statistics over reading values
//!
//! Every function tolerates an empty input: the mean of nothing is `0.0`, and
//! the extrema and deviation of nothing are absent.

use crate::analytics::bucketing::{DayBucket, DayPeriod};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), `0.0` below two samples
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let squared: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (squared / (values.len() - 1) as f64).sqrt()
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Mean, deviation and extrema of a non-empty sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `None` for an empty sample
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            count: values.len(),
            mean: mean(values),
            std_dev: sample_std_dev(values),
            min: min(values)?,
            max: max(values)?,
        })
    }
}

/// Statistics of one local calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayStatistics {
    pub date: NaiveDate,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Only periods that had readings appear here
    pub period_means: BTreeMap<DayPeriod, f64>,
}

impl DayStatistics {
    /// `None` when the bucket holds no readings
    pub fn from_bucket(date: NaiveDate, bucket: &DayBucket) -> Option<Self> {
        let summary = Summary::of(&bucket.values())?;
        let period_means = bucket
            .periods()
            .map(|(period, readings)| {
                let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
                (period, mean(&values))
            })
            .collect();

        Some(Self {
            date,
            mean: summary.mean,
            std_dev: summary.std_dev,
            min: summary.min,
            max: summary.max,
            period_means,
        })
    }

    /// Day of month as printed in the first grid column
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn period_mean(&self, period: DayPeriod) -> Option<f64> {
        self.period_means.get(&period).copied()
    }
}
