//! Compliance Report - periodic sensor compliance documents
//!
//! Turns a bounded window of temperature or humidity readings for one device
//! into a fixed-template PDF: a daily statistics grid, a histogram and a trend
//! chart, a compliance paragraph and the signature of the person in charge.
//! Fetching readings, persisting documents and delivering them belong to the
//! caller.

pub mod analytics;
pub mod application;
pub mod charts;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod layout;
pub mod pdf;
pub mod report;

pub use application::{MaxConcurrentReports, ReportService};
pub use domain::{
    Branch, Device, DeviceFunction, Reading, ReadingSeries, ReadingType, RenderedReport,
    ReportBundle, ReportPeriod, ReportRequest, SignatureImage, WorkingRange,
};
pub use error::{ReportError, Result};
pub use report::{ReportAssembler, ReportOptions, Stage};
