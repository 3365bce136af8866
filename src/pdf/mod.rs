//! PDF output for a finished canvas

pub mod encoding;
pub mod writer;

pub use writer::{write_pdf, DocumentInfo, PdfError};
