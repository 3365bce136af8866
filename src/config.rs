use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub report: ReportSettings,
    pub batch: BatchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReportSettings {
    /// IANA zone used for day and period bucketing
    pub time_zone: String,
    pub sampling_interval_minutes: u32,
    pub out_of_range_streak: usize,
    pub max_period_days: i64,
    pub sensor_model: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BatchSettings {
    pub max_concurrent_reports: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("report.time_zone", "America/Sao_Paulo")?
            .set_default("report.sampling_interval_minutes", 3)?
            .set_default("report.out_of_range_streak", 7)?
            .set_default("report.max_period_days", 14)?
            .set_default("report.sensor_model", "SONOFF")?
            .set_default("batch.max_concurrent_reports", 4)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("COMPLIANCE_REPORT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    /// Built-in defaults, ignoring files and environment
    fn default() -> Self {
        Self {
            report: ReportSettings {
                time_zone: "America/Sao_Paulo".to_string(),
                sampling_interval_minutes: 3,
                out_of_range_streak: 7,
                max_period_days: 14,
                sensor_model: "SONOFF".to_string(),
            },
            batch: BatchSettings {
                max_concurrent_reports: 4,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
