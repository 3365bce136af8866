//! Text rendering of analytics figures

use crate::analytics::compliance::InRangeDuration;
use serde::{Deserialize, Serialize};

/// Two fixed decimal digits, as printed on the grid and in the narrative
pub fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Singular and plural word for one duration component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLabel {
    pub singular: String,
    pub plural: String,
}

impl UnitLabel {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Plural for everything except exactly one
    pub fn for_count(&self, count: u64) -> &str {
        if count == 1 {
            &self.singular
        } else {
            &self.plural
        }
    }
}

/// Locale words used by [`duration`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLabels {
    pub day: UnitLabel,
    pub hour: UnitLabel,
    pub minute: UnitLabel,
}

/// Render `D dias, H horas, M minutos`
///
/// Leading zero components are dropped; once a component is printed every
/// smaller one follows, and minutes are always printed.
pub fn duration(value: InRangeDuration, labels: &DurationLabels) -> String {
    let components = [
        (value.days(), &labels.day),
        (value.hours(), &labels.hour),
        (value.minutes(), &labels.minute),
    ];

    let last = components.len() - 1;
    components
        .iter()
        .enumerate()
        .skip_while(|(index, (count, _))| *count == 0 && *index < last)
        .map(|(_, (count, label))| format!("{count} {}", label.for_count(*count)))
        .collect::<Vec<_>>()
        .join(", ")
}
