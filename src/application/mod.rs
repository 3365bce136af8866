//! Application layer: the report service exposed to callers

pub mod service;

pub use service::{MaxConcurrentReports, ReportService};
