//! Report requests and rendered output

use crate::domain::device::{Branch, Device};
use crate::domain::period::ReportPeriod;
use crate::domain::reading::{ReadingSeries, ReadingType};
use crate::error::{ReportError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// MIME prefix of an encoded PDF document
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

const IMAGE_DATA_URL_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// Decoded signature raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    format: String,
    bytes: Vec<u8>,
}

impl SignatureImage {
    /// Decode a `data:image/<fmt>;base64,<data>` URL
    pub fn from_data_url(encoded: &str) -> Result<Self> {
        let rest = encoded
            .strip_prefix(IMAGE_DATA_URL_PREFIX)
            .ok_or_else(|| ReportError::invalid_input("signature", "missing data:image/ prefix"))?;
        let (format, data) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| ReportError::invalid_input("signature", "missing ;base64, marker"))?;
        if format.is_empty() {
            return Err(ReportError::invalid_input("signature", "empty image format"));
        }
        if !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReportError::invalid_input(
                "signature",
                format!("invalid image format {format:?}"),
            ));
        }

        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| ReportError::invalid_input("signature", e))?;

        Ok(Self {
            format: format.to_ascii_lowercase(),
            bytes,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One unit of work: a single device, measurement type and period
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub branch: Branch,
    pub period: ReportPeriod,
    pub reading_type: ReadingType,
    pub device: Device,
    pub signature: SignatureImage,
    pub readings: ReadingSeries,
}

/// Finished document handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReport {
    pub file_name: String,
    pub document_base64: String,
}

impl RenderedReport {
    /// Wrap raw PDF bytes into the data-URL form
    pub fn from_pdf(file_name: String, pdf: &[u8]) -> Self {
        Self {
            file_name,
            document_base64: format!("{PDF_DATA_URL_PREFIX}{}", STANDARD.encode(pdf)),
        }
    }

    /// Raw PDF bytes behind the data URL
    pub fn decode_document(&self) -> Result<Vec<u8>> {
        let data = self
            .document_base64
            .strip_prefix(PDF_DATA_URL_PREFIX)
            .ok_or_else(|| ReportError::invalid_input("document", "missing PDF data URL prefix"))?;
        STANDARD
            .decode(data)
            .map_err(|e| ReportError::invalid_input("document", e))
    }
}

/// Reports produced by one batch run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportBundle {
    pub reports: Vec<RenderedReport>,
}
