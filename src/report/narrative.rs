//! Compliance paragraph printed below the charts

use crate::analytics::format::{decimal, duration};
use crate::analytics::ReportAnalytics;
use crate::domain::device::Device;
use crate::domain::period::ReportPeriod;
use crate::domain::reading::ReadingType;
use crate::report::messages::{render, MessageCatalog};
use crate::report::options::ReportOptions;

/// Warning note, empty unless the series had a sustained excursion
pub fn warning_note(
    messages: &MessageCatalog,
    options: &ReportOptions,
    device: &Device,
    reading_type: ReadingType,
    analytics: &ReportAnalytics,
) -> String {
    if !analytics.has_sustained_excursion() {
        return String::new();
    }
    let streak_minutes = options.streak_limit.into_inner() as u64
        * u64::from(options.sampling_interval.into_inner());
    messages.note(reading_type, device.function, streak_minutes)
}

/// Full narrative text for one report
pub fn compose(
    messages: &MessageCatalog,
    options: &ReportOptions,
    device: &Device,
    reading_type: ReadingType,
    period: &ReportPeriod,
    analytics: &ReportAnalytics,
) -> String {
    let range = device.working_range(reading_type);
    let sensor = options.sensor_model.to_string();
    let tag = device.tag.to_string();
    let interval = options.sampling_interval.to_string();
    let period_text = messages.period_text(period);
    let min = decimal(range.min());
    let max = decimal(range.max());
    let in_range = duration(analytics.in_range, &messages.duration);
    let note = warning_note(messages, options, device, reading_type, analytics);

    render(
        &messages.narrative,
        &[
            ("measurement", messages.measurement(reading_type)),
            ("sensor", sensor.as_str()),
            ("tag", tag.as_str()),
            ("interval", interval.as_str()),
            ("period", period_text.as_str()),
            ("min", min.as_str()),
            ("max", max.as_str()),
            ("unit", messages.unit(reading_type)),
            ("duration", in_range.as_str()),
            ("note", note.as_str()),
        ],
    )
}
