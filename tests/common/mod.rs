//! Shared fixtures for the integration tests

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use compliance_report::domain::device::{
    DeviceName, DeviceTag, EquipmentType, PatrimonyNumber, Sector,
};
use compliance_report::domain::MaxPeriodDays;
use compliance_report::{
    Branch, Device, DeviceFunction, Reading, ReadingSeries, ReadingType, ReportPeriod,
    ReportRequest, SignatureImage, WorkingRange,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Nominal cadence of the fixtures, in minutes
pub const SAMPLING_MINUTES: i64 = 3;

/// Readings per day at the nominal cadence
pub const READINGS_PER_DAY: usize = 480;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Local midnight of 2024-06-03 in America/Sao_Paulo
pub fn first_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 3, 0, 0).unwrap()
}

pub fn device(function: DeviceFunction) -> Device {
    Device {
        name: DeviceName::try_new("Geladeira de vacinas".to_string()).unwrap(),
        tag: DeviceTag::try_new("SNF-7731".to_string()).unwrap(),
        sector: Sector::try_new("Farmácia".to_string()).unwrap(),
        equipment_type: EquipmentType::try_new("Geladeira".to_string()).unwrap(),
        patrimony: PatrimonyNumber::new(20931),
        function,
        branch: Branch::SaoPaulo,
        temperature_range: WorkingRange::try_new(18.0, 22.0).unwrap(),
        humidity_range: WorkingRange::try_new(40.0, 60.0).unwrap(),
    }
}

/// Readings at the nominal cadence starting at [`first_instant`]
pub fn readings(values: impl IntoIterator<Item = f64>) -> Vec<Reading> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Reading::new(
                first_instant() + Duration::minutes(SAMPLING_MINUTES * i as i64),
                value,
            )
        })
        .collect()
}

/// `count` readings oscillating inside the 18-22 band
pub fn compliant_readings(count: usize) -> Vec<Reading> {
    readings((0..count).map(|i| 19.0 + (i % 20) as f64 * 0.1))
}

pub fn signature_png() -> Vec<u8> {
    let mut image = RgbaImage::from_pixel(60, 20, Rgba([255, 255, 255, 0]));
    for x in 5..55 {
        image.put_pixel(x, 10, Rgba([0, 0, 0, 255]));
    }
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode fixture signature");
    bytes.into_inner()
}

pub fn signature_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(signature_png()))
}

pub fn request(
    start: NaiveDate,
    end: NaiveDate,
    reading_type: ReadingType,
    readings: Vec<Reading>,
) -> ReportRequest {
    ReportRequest {
        branch: Branch::SaoPaulo,
        period: ReportPeriod::new(start, end, MaxPeriodDays::default()).unwrap(),
        reading_type,
        device: device(DeviceFunction::Equipment),
        signature: SignatureImage::from_data_url(&signature_data_url()).unwrap(),
        readings: ReadingSeries::new(readings),
    }
}

/// Page count of an encoded PDF
pub fn page_count(pdf: &[u8]) -> usize {
    lopdf::Document::load_mem(pdf)
        .expect("generated PDF reloads")
        .get_pages()
        .len()
}
