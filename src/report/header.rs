//! Header block: title, period, branch and device identification

use crate::domain::device::{Branch, Device};
use crate::domain::period::ReportPeriod;
use crate::domain::reading::ReadingType;
use crate::layout::canvas::{Canvas, LayoutError};
use crate::layout::fonts::FontFace;
use crate::layout::geometry::LayoutCursor;
use crate::report::constants::header;
use crate::report::messages::MessageCatalog;

/// Values printed in the header, already localized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    pub title: String,
    pub period: String,
    pub branch: String,
    pub sector: String,
    pub function: String,
    pub equipment_type: String,
    pub patrimony: String,
}

impl HeaderFields {
    pub fn new(
        messages: &MessageCatalog,
        branch: Branch,
        period: &ReportPeriod,
        device: &Device,
        reading_type: ReadingType,
    ) -> Self {
        Self {
            title: messages.title(reading_type).to_string(),
            period: messages.period_text(period),
            branch: messages.branch(branch).to_string(),
            sector: device.sector.to_string(),
            function: messages.function(device.function).to_string(),
            equipment_type: device.equipment_type.to_string(),
            patrimony: device.patrimony.to_string(),
        }
    }

    /// `(x, y, text, bold)` for every header value
    fn placements(&self) -> [(f32, f32, &str, bool); 7] {
        [
            (header::DETAILS_X, header::PERIOD_Y, self.period.as_str(), false),
            (header::DETAILS_X, header::BRANCH_Y, self.branch.as_str(), false),
            (header::DETAILS_X, header::SECTOR_Y, self.sector.as_str(), false),
            (header::TITLE_X, header::TITLE_Y, self.title.as_str(), true),
            (header::FUNCTION_X, header::DEVICE_Y, self.function.as_str(), false),
            (header::EQUIPMENT_TYPE_X, header::DEVICE_Y, self.equipment_type.as_str(), false),
            (header::PATRIMONY_X, header::DEVICE_Y, self.patrimony.as_str(), false),
        ]
    }

    /// Write the header onto the cursor's page; the cursor is returned as is
    pub fn draw(&self, canvas: &mut Canvas, cursor: LayoutCursor) -> Result<LayoutCursor, LayoutError> {
        for (x, y, text, bold) in self.placements() {
            canvas.draw_text(cursor.page, x, y, text, FontFace::from_bold(bold), header::FONT_SIZE)?;
        }
        Ok(cursor)
    }
}
