//! Validated report parameters resolved from settings

use crate::analytics::compliance::{SamplingInterval, StreakLimit};
use crate::config::ReportSettings;
use crate::domain::period::MaxPeriodDays;
use crate::error::{ReportError, Result};
use chrono_tz::Tz;
use nutype::nutype;

/// Sensor model quoted in the narrative
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 60),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Display)
)]
pub struct SensorModel(String);

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub time_zone: Tz,
    pub sampling_interval: SamplingInterval,
    pub streak_limit: StreakLimit,
    pub max_period_days: MaxPeriodDays,
    pub sensor_model: SensorModel,
}

impl ReportOptions {
    pub fn from_settings(settings: &ReportSettings) -> Result<Self> {
        let time_zone = settings
            .time_zone
            .parse::<Tz>()
            .map_err(|e| ReportError::invalid_input("report.time_zone", e))?;

        Ok(Self {
            time_zone,
            sampling_interval: SamplingInterval::try_new(settings.sampling_interval_minutes)
                .map_err(|e| ReportError::invalid_input("report.sampling_interval_minutes", e))?,
            streak_limit: StreakLimit::try_new(settings.out_of_range_streak)
                .map_err(|e| ReportError::invalid_input("report.out_of_range_streak", e))?,
            max_period_days: MaxPeriodDays::try_new(settings.max_period_days)
                .map_err(|e| ReportError::invalid_input("report.max_period_days", e))?,
            sensor_model: SensorModel::try_new(settings.sensor_model.clone())
                .map_err(|e| ReportError::invalid_input("report.sensor_model", e))?,
        })
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::Sao_Paulo,
            sampling_interval: SamplingInterval::default(),
            streak_limit: StreakLimit::default(),
            max_period_days: MaxPeriodDays::default(),
            sensor_model: SensorModel::try_new("SONOFF".to_string())
                .expect("SONOFF is a valid sensor model"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_default_settings_resolve() {
        let options = ReportOptions::from_settings(&Settings::default().report).unwrap();
        assert_eq!(options, ReportOptions::default());
    }

    #[test]
    fn test_unknown_time_zone_is_rejected() {
        let mut settings = Settings::default().report;
        settings.time_zone = "Mars/Olympus_Mons".to_string();
        let err = ReportOptions::from_settings(&settings).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput { ref field, .. } if field == "report.time_zone"));
    }

    #[test]
    fn test_zero_sampling_interval_is_rejected() {
        let mut settings = Settings::default().report;
        settings.sampling_interval_minutes = 0;
        assert!(ReportOptions::from_settings(&settings).is_err());
    }

    #[test]
    fn test_max_period_beyond_two_weeks_is_rejected() {
        let mut settings = Settings::default().report;
        settings.max_period_days = 15;
        let err = ReportOptions::from_settings(&settings).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidInput { ref field, .. } if field == "report.max_period_days"
        ));
    }
}
