//! Report assembly on top of the analytics, chart and layout layers

pub mod assembler;
pub mod constants;
pub mod grid;
pub mod header;
pub mod messages;
pub mod narrative;
pub mod options;
pub mod stage;
pub mod template;

pub use assembler::{AssembledReport, ReportAssembler};
pub use grid::MetricsGrid;
pub use header::HeaderFields;
pub use messages::MessageCatalog;
pub use options::{ReportOptions, SensorModel};
pub use stage::Stage;
pub use template::ReportTemplate;
