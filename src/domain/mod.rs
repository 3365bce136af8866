//! Domain types for compliance reporting
//!
//! Devices, readings, periods and the request/response shapes exchanged with
//! the surrounding service. Everything here is an immutable snapshot for the
//! duration of one report.

pub mod device;
pub mod period;
pub mod reading;
pub mod request;

pub use device::{
    Branch, Device, DeviceFunction, DeviceName, DeviceTag, EquipmentType, PatrimonyNumber,
    Sector, WorkingRange,
};
pub use period::{MaxPeriodDays, PeriodViolation, ReportPeriod};
pub use reading::{Reading, ReadingSeries, ReadingType};
pub use request::{RenderedReport, ReportBundle, ReportRequest, SignatureImage};
