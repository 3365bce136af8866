use crate::domain::period::PeriodViolation;
use crate::report::stage::Stage;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Compliance report error types
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report period {start} to {end}: {violation}")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
        violation: PeriodViolation,
    },

    #[error("Report generation failed during {stage}: {reason}")]
    ReportGeneration { stage: Stage, reason: String },

    #[error("Failed to load asset '{path}': {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Report task failed: {0}")]
    Task(String),

    #[error("Telemetry setup failed: {0}")]
    Telemetry(String),
}

impl ReportError {
    pub fn generation(stage: Stage, reason: impl fmt::Display) -> Self {
        Self::ReportGeneration {
            stage,
            reason: reason.to_string(),
        }
    }

    pub fn asset(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure was caused by the caller's request rather than by
    /// rendering or deployment problems
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidPeriod { .. } | Self::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
