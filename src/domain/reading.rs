//! Sensor readings and measurement types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of measurement a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingType {
    Temperature,
    Humidity,
}

impl ReadingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

impl fmt::Display for ReadingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single time-stamped sensor value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Readings of one device and measurement type, ordered by timestamp
///
/// Construction sorts the input (stable, so equal timestamps keep their
/// original order), which lets callers hand over storage results in any order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Reading>", into = "Vec<Reading>")]
pub struct ReadingSeries(Vec<Reading>);

impl ReadingSeries {
    pub fn new(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|reading| reading.timestamp);
        Self(readings)
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.0.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|reading| reading.value)
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.0.first().map(|reading| reading.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.0.last().map(|reading| reading.timestamp)
    }
}

impl From<Vec<Reading>> for ReadingSeries {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}

impl From<ReadingSeries> for Vec<Reading> {
    fn from(series: ReadingSeries) -> Self {
        series.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_series_is_sorted_on_construction() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let series = ReadingSeries::new(vec![
            Reading::new(base + Duration::minutes(6), 3.0),
            Reading::new(base, 1.0),
            Reading::new(base + Duration::minutes(3), 2.0),
        ]);

        assert_eq!(series.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first_timestamp(), Some(base));
        assert_eq!(series.last_timestamp(), Some(base + Duration::minutes(6)));
    }

    #[test]
    fn test_reading_type_serde_names() {
        let json = serde_json::to_string(&ReadingType::Temperature).unwrap();
        assert_eq!(json, "\"TEMPERATURE\"");
        let parsed: ReadingType = serde_json::from_str("\"HUMIDITY\"").unwrap();
        assert_eq!(parsed, ReadingType::Humidity);
    }

    #[test]
    fn test_series_deserializes_unsorted_input() {
        let json = r#"[
            {"timestamp": "2024-05-01T12:03:00Z", "value": 2.0},
            {"timestamp": "2024-05-01T12:00:00Z", "value": 1.0}
        ]"#;
        let series: ReadingSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.values().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }
}
