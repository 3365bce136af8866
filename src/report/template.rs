//! The fixed form skeleton printed under every report
//!
//! Static labels, the grid's column headings and the boxes around them are
//! described in an embedded JSON asset and painted onto the first page
//! before any data is drawn.

use crate::error::{ReportError, Result};
use crate::infrastructure::assets;
use crate::layout::canvas::{Canvas, LayoutError};
use crate::layout::fonts::FontFace;
use crate::layout::geometry::{PageFormat, Rect};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TemplateElement {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontFace,
        size: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportTemplate {
    pub name: String,
    pub page: PageFormat,
    pub elements: Vec<TemplateElement>,
}

impl ReportTemplate {
    pub fn load(path: &str) -> Result<Self> {
        let template: Self = serde_json::from_str(assets::load_text(path)?)
            .map_err(|e| ReportError::asset(path, e))?;
        if template.page.width <= 0.0 || template.page.height <= 0.0 {
            return Err(ReportError::asset(path, "page format must be positive"));
        }
        Ok(template)
    }

    pub fn embedded() -> Result<Self> {
        Self::load(assets::REPORT_TEMPLATE)
    }

    /// Fresh canvas in the template's page format with the skeleton on page 1
    pub fn new_canvas(&self) -> std::result::Result<Canvas, LayoutError> {
        let mut canvas = Canvas::new(self.page);
        self.draw_onto(&mut canvas)?;
        Ok(canvas)
    }

    pub fn draw_onto(&self, canvas: &mut Canvas) -> std::result::Result<(), LayoutError> {
        let page = canvas.ensure_page();
        for element in &self.elements {
            match element {
                TemplateElement::Text {
                    x,
                    y,
                    text,
                    font,
                    size,
                } => canvas.draw_text(page, *x, *y, text, *font, *size)?,
                TemplateElement::Rect {
                    x,
                    y,
                    width,
                    height,
                    line_width,
                } => canvas.draw_rect(page, Rect::new(*x, *y, *width, *height), *line_width)?,
            }
        }
        Ok(())
    }
}
