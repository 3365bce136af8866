//! Paginated drawing surface
//!
//! A [`Canvas`] records drawing operations per page as a closed set of
//! [`DrawOp`] variants. Nothing is encoded until the canvas is handed to the
//! PDF writer, which keeps the drawing sequence independent of the document
//! library.

use crate::error::ReportError;
use crate::layout::fonts::FontFace;
use crate::layout::geometry::{PageFormat, Rect};
use image::GenericImageView;
use std::sync::Arc;
use thiserror::Error;

/// Failures while drawing onto a canvas
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Page {page} does not exist, the canvas has {pages} page(s)")]
    NoSuchPage { page: usize, pages: usize },

    #[error("Failed to decode raster image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Font metrics unavailable: {0}")]
    Metrics(#[from] ReportError),
}

/// Decoded raster ready for embedding as an image XObject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    /// Present only when at least one pixel is not fully opaque
    alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode PNG or JPEG bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, LayoutError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = decoded.dimensions();
        let rgba = decoded.to_rgba8();

        let pixels = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }
        let alpha = alpha.iter().any(|a| *a < u8::MAX).then_some(alpha);

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed 8-bit RGB samples, row-major from the top-left pixel
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }
}

/// One drawing operation in page space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
    },
    Rect {
        rect: Rect,
        line_width: f32,
    },
    Image {
        rect: Rect,
        image: Arc<RasterImage>,
    },
}

/// Operations recorded for one page, in painting order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text runs in painting order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = (&Rect, &Arc<RasterImage>)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { rect, image } => Some((rect, image)),
            _ => None,
        })
    }
}

/// The page layout engine: a fixed page format and a growing list of pages
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    format: PageFormat,
    pages: Vec<Page>,
}

impl Canvas {
    pub fn new(format: PageFormat) -> Self {
        Self {
            format,
            pages: Vec::new(),
        }
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the first page, creating it when the canvas is empty
    pub fn ensure_page(&mut self) -> usize {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        0
    }

    /// Append a blank page and return its index
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.pages.len() - 1
    }

    /// Index of the page following `page`, appending one when needed
    pub fn page_after(&mut self, page: usize) -> usize {
        let next = page + 1;
        while self.pages.len() <= next {
            self.add_page();
        }
        next
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut Page, LayoutError> {
        let pages = self.pages.len();
        self.pages
            .get_mut(page)
            .ok_or(LayoutError::NoSuchPage { page, pages })
    }

    pub fn draw_text(
        &mut self,
        page: usize,
        x: f32,
        y: f32,
        text: &str,
        face: FontFace,
        size: f32,
    ) -> Result<(), LayoutError> {
        self.page_mut(page)?.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            face,
            size,
        });
        Ok(())
    }

    pub fn draw_rect(&mut self, page: usize, rect: Rect, line_width: f32) -> Result<(), LayoutError> {
        self.page_mut(page)?
            .ops
            .push(DrawOp::Rect { rect, line_width });
        Ok(())
    }

    /// Decode `bytes` and scale the raster into `rect`
    pub fn draw_image(&mut self, page: usize, rect: Rect, bytes: &[u8]) -> Result<(), LayoutError> {
        let image = Arc::new(RasterImage::decode(bytes)?);
        self.draw_raster(page, rect, image)
    }

    pub fn draw_raster(
        &mut self,
        page: usize,
        rect: Rect,
        image: Arc<RasterImage>,
    ) -> Result<(), LayoutError> {
        self.page_mut(page)?.ops.push(DrawOp::Image { rect, image });
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(PageFormat::A4)
    }
}
