//! Infrastructure concerns of the report core
//!
//! Embedded read-only assets and tracing setup. The core performs no
//! network or database I/O.

pub mod assets;
pub mod telemetry;

pub use telemetry::{init_tracing, LogFormat};
