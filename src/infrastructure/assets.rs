//! Read-only resources compiled into the crate
//!
//! Fonts, the form template and locale messages are addressed by a fixed
//! relative path. A path that is not registered here is a deployment defect
//! and surfaces as [`ReportError::AssetLoad`].

use crate::error::{ReportError, Result};

pub const HELVETICA_AFM: &str = "fonts/Helvetica.afm";
pub const HELVETICA_BOLD_AFM: &str = "fonts/Helvetica-Bold.afm";
pub const REPORT_TEMPLATE: &str = "template/report-template.json";
pub const MESSAGES_PT_BR: &str = "messages/pt-BR.json";

const EMBEDDED: &[(&str, &[u8])] = &[
    (
        HELVETICA_AFM,
        include_bytes!("../../assets/fonts/Helvetica.afm"),
    ),
    (
        HELVETICA_BOLD_AFM,
        include_bytes!("../../assets/fonts/Helvetica-Bold.afm"),
    ),
    (
        REPORT_TEMPLATE,
        include_bytes!("../../assets/template/report-template.json"),
    ),
    (
        MESSAGES_PT_BR,
        include_bytes!("../../assets/messages/pt-BR.json"),
    ),
];

/// Raw bytes of an embedded asset
pub fn load(path: &str) -> Result<&'static [u8]> {
    EMBEDDED
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, bytes)| *bytes)
        .ok_or_else(|| ReportError::asset(path, "not embedded in this build"))
}

/// Embedded asset decoded as UTF-8
pub fn load_text(path: &str) -> Result<&'static str> {
    let bytes = load(path)?;
    std::str::from_utf8(bytes).map_err(|e| ReportError::asset(path, e))
}

/// Paths of every embedded asset
pub fn paths() -> impl Iterator<Item = &'static str> {
    EMBEDDED.iter().map(|(name, _)| *name)
}
