//! Page layout: geometry, fonts, the drawing canvas and paragraph flow

pub mod canvas;
pub mod fonts;
pub mod geometry;
pub mod text_flow;

pub use canvas::{Canvas, DrawOp, LayoutError, Page, RasterImage};
pub use fonts::{FontCache, FontFace, FontMetrics};
pub use geometry::{LayoutCursor, PageFormat, Rect};
pub use text_flow::TextFlow;
