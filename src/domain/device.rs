//! Device snapshot used while a report is generated
//!
//! The storage layer owns devices; the report core only receives an immutable
//! copy of the descriptive attributes it prints and the working ranges it
//! evaluates readings against.

use crate::domain::reading::ReadingType;
use crate::error::{ReportError, Result};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable device name
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 120),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct DeviceName(String);

/// Identification tag printed on the physical sensor
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 60),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct DeviceTag(String);

/// Sector of the facility where the device is installed
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 120),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct Sector(String);

/// Type of equipment being monitored (refrigerator, storeroom, ...)
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 120),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct EquipmentType(String);

/// Asset (patrimony) number of the monitored equipment
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display
))]
pub struct PatrimonyNumber(u64);

/// What the device monitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceFunction {
    /// A closed piece of equipment (fridge, freezer, incubator)
    Equipment,
    /// An open room or storage environment
    Environment,
}

impl DeviceFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Environment => "environment",
        }
    }
}

/// Branch (site) a device belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Branch {
    NewYork,
    SaoPaulo,
    Salvador,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewYork => "new_york",
            Self::SaoPaulo => "sao_paulo",
            Self::Salvador => "salvador",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acceptable working band `[min, max]` for one measurement type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkingRange")]
pub struct WorkingRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawWorkingRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawWorkingRange> for WorkingRange {
    type Error = ReportError;

    fn try_from(raw: RawWorkingRange) -> Result<Self> {
        Self::try_new(raw.min, raw.max)
    }
}

impl WorkingRange {
    pub fn try_new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ReportError::invalid_input(
                "working_range",
                format!("bounds must be finite, got [{min}, {max}]"),
            ));
        }
        if min > max {
            return Err(ReportError::invalid_input(
                "working_range",
                format!("minimum {min} exceeds maximum {max}"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Immutable device snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: DeviceName,
    pub tag: DeviceTag,
    pub sector: Sector,
    pub equipment_type: EquipmentType,
    pub patrimony: PatrimonyNumber,
    pub function: DeviceFunction,
    pub branch: Branch,
    pub temperature_range: WorkingRange,
    pub humidity_range: WorkingRange,
}

impl Device {
    /// Working range for the given measurement type
    pub fn working_range(&self, reading_type: ReadingType) -> WorkingRange {
        match reading_type {
            ReadingType::Temperature => self.temperature_range,
            ReadingType::Humidity => self.humidity_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_newtypes_trim_and_reject_empty() {
        let sector = Sector::try_new("  Farmácia ".to_string()).unwrap();
        assert_eq!(sector.as_ref(), "Farmácia");

        assert!(DeviceTag::try_new("   ".to_string()).is_err());
        assert!(DeviceName::try_new("x".repeat(121)).is_err());
    }

    #[test]
    fn test_working_range_is_inclusive() {
        let range = WorkingRange::try_new(18.0, 22.0).unwrap();
        assert!(range.contains(18.0));
        assert!(range.contains(22.0));
        assert!(!range.contains(17.99));
        assert!(!range.contains(22.01));
    }

    #[test]
    fn test_working_range_rejects_inverted_or_non_finite_bounds() {
        assert!(WorkingRange::try_new(25.0, 2.0).is_err());
        assert!(WorkingRange::try_new(f64::NAN, 2.0).is_err());
        assert!(WorkingRange::try_new(2.0, f64::INFINITY).is_err());
        assert!(WorkingRange::try_new(4.0, 4.0).is_ok());
    }

    #[test]
    fn test_working_range_deserialization_validates() {
        let ok: WorkingRange = serde_json::from_str(r#"{"min": 2.0, "max": 8.0}"#).unwrap();
        assert_eq!(ok.max(), 8.0);

        let inverted = serde_json::from_str::<WorkingRange>(r#"{"min": 8.0, "max": 2.0}"#);
        assert!(inverted.is_err());
    }
}
