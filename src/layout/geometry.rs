//! Page formats and the write cursor
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page, so `y` decreases while content flows down the page.

use serde::{Deserialize, Serialize};

/// Width and height of a page in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width: f32,
    pub height: f32,
}

impl PageFormat {
    /// ISO A4 (210 x 297 mm)
    pub const A4: PageFormat = PageFormat {
        width: 595.275_63,
        height: 841.889_8,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::A4
    }
}

/// Current page and `(x, y)` write position
///
/// Drawing steps take a cursor and hand back the cursor for the next step
/// instead of sharing a mutable position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutCursor {
    pub page: usize,
    pub x: f32,
    pub y: f32,
}

impl LayoutCursor {
    pub fn new(page: usize, x: f32, y: f32) -> Self {
        Self { page, x, y }
    }

    pub fn at(self, x: f32, y: f32) -> Self {
        Self { x, y, ..self }
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    /// Move down by `distance` points
    pub fn down(self, distance: f32) -> Self {
        Self {
            y: self.y - distance,
            ..self
        }
    }

    /// Top-of-content position on the page after this one
    pub fn next_page(self, x: f32, top: f32) -> Self {
        Self {
            page: self.page + 1,
            x,
            y: top,
        }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_are_values() {
        let start = LayoutCursor::new(0, 25.0, 300.0);
        let moved = start.down(15.0);

        assert_eq!(start.y, 300.0);
        assert_eq!(moved.y, 285.0);
        assert_eq!(moved.page, 0);

        let next = moved.next_page(25.0, 791.9);
        assert_eq!(next.page, 1);
        assert_eq!(next.y, 791.9);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(47.1, 575.8, 39.2, 17.6);
        assert!((rect.top() - 593.4).abs() < 1e-4);
        assert!((rect.right() - 86.3).abs() < 1e-4);
    }
}
