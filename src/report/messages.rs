//! Locale strings keyed by measurement type and device function
//!
//! Layout and statistics stay language-neutral; every word printed on the
//! form comes from a catalog loaded from an embedded JSON asset.

use crate::analytics::format::DurationLabels;
use crate::charts::ChartKind;
use crate::domain::device::{Branch, DeviceFunction};
use crate::domain::period::ReportPeriod;
use crate::domain::reading::ReadingType;
use crate::error::{ReportError, Result};
use crate::infrastructure::assets;
use chrono::Datelike;
use serde::Deserialize;

/// Day and month as printed in periods and file names
const DAY_MONTH_FORMAT: &str = "%d/%m";
const FILE_DATE_FORMAT: &str = "%d.%m";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ByMeasurement<T> {
    pub temperature: T,
    pub humidity: T,
}

impl<T> ByMeasurement<T> {
    pub fn get(&self, reading_type: ReadingType) -> &T {
        match reading_type {
            ReadingType::Temperature => &self.temperature,
            ReadingType::Humidity => &self.humidity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ByFunction<T> {
    pub equipment: T,
    pub environment: T,
}

impl<T> ByFunction<T> {
    pub fn get(&self, function: DeviceFunction) -> &T {
        match function {
            DeviceFunction::Equipment => &self.equipment,
            DeviceFunction::Environment => &self.environment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchNames {
    pub new_york: String,
    pub sao_paulo: String,
    pub salvador: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartCaptions {
    pub frequency: String,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageCatalog {
    pub locale: String,
    pub titles: ByMeasurement<String>,
    pub grid_titles: ByMeasurement<String>,
    pub measurements: ByMeasurement<String>,
    pub file_measurements: ByMeasurement<String>,
    pub units: ByMeasurement<String>,
    pub functions: ByFunction<String>,
    pub branches: BranchNames,
    pub period: String,
    pub narrative: String,
    pub notes: ByMeasurement<ByFunction<String>>,
    pub duration: DurationLabels,
    pub file_name: String,
    pub charts: ChartCaptions,
}

/// Replace every `{key}` placeholder with its value
///
/// The template is scanned once, so substituted values are copied verbatim
/// even when they contain braces. Unknown placeholders are left untouched.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            text.push_str(&rest[open..]);
            return text;
        };

        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => text.push_str(value),
            None => text.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    text.push_str(rest);
    text
}

impl MessageCatalog {
    pub fn load(path: &str) -> Result<Self> {
        serde_json::from_str(assets::load_text(path)?).map_err(|e| ReportError::asset(path, e))
    }

    /// Brazilian Portuguese, the reference deployment's language
    pub fn pt_br() -> Result<Self> {
        Self::load(assets::MESSAGES_PT_BR)
    }

    pub fn title(&self, reading_type: ReadingType) -> &str {
        self.titles.get(reading_type)
    }

    pub fn grid_title(&self, reading_type: ReadingType) -> &str {
        self.grid_titles.get(reading_type)
    }

    pub fn measurement(&self, reading_type: ReadingType) -> &str {
        self.measurements.get(reading_type)
    }

    pub fn unit(&self, reading_type: ReadingType) -> &str {
        self.units.get(reading_type)
    }

    pub fn function(&self, function: DeviceFunction) -> &str {
        self.functions.get(function)
    }

    pub fn branch(&self, branch: Branch) -> &str {
        match branch {
            Branch::NewYork => &self.branches.new_york,
            Branch::SaoPaulo => &self.branches.sao_paulo,
            Branch::Salvador => &self.branches.salvador,
        }
    }

    pub fn chart_caption(&self, kind: ChartKind) -> &str {
        match kind {
            ChartKind::Frequency => &self.charts.frequency,
            ChartKind::Trend => &self.charts.trend,
        }
    }

    /// Warning appended to the narrative after a sustained excursion
    ///
    /// `minutes` is the streak length in minutes, quoted by notes that
    /// mention it.
    pub fn note(&self, reading_type: ReadingType, function: DeviceFunction, minutes: u64) -> String {
        let minutes = minutes.to_string();
        render(
            self.notes.get(reading_type).get(function),
            &[("minutes", minutes.as_str())],
        )
    }

    /// `dd/MM a dd/MM de yyyy` in the reference locale
    pub fn period_text(&self, period: &ReportPeriod) -> String {
        let start = period.start().format(DAY_MONTH_FORMAT).to_string();
        let end = period.end().format(DAY_MONTH_FORMAT).to_string();
        let year = period.end().year().to_string();
        render(
            &self.period,
            &[
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("year", year.as_str()),
            ],
        )
    }

    /// Space-joined measurement, dates, sector and equipment type
    pub fn file_name(
        &self,
        reading_type: ReadingType,
        period: &ReportPeriod,
        sector: &str,
        equipment_type: &str,
    ) -> String {
        let start = period.start().format(FILE_DATE_FORMAT).to_string();
        let end = period.end().format(FILE_DATE_FORMAT).to_string();
        render(
            &self.file_name,
            &[
                ("measurement", self.file_measurements.get(reading_type).as_str()),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("sector", sector),
                ("equipment_type", equipment_type),
            ],
        )
    }
}
