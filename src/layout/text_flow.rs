//! Word-wrapped paragraphs that flow across pages

use crate::layout::canvas::{Canvas, LayoutError};
use crate::layout::fonts::{FontFace, FontMetrics};
use crate::layout::geometry::LayoutCursor;

/// Line pitch as a multiple of the font size
pub const DEFAULT_LINE_SPACING: f32 = 1.5;

/// Lines are never placed at or below this height
pub const DEFAULT_BOTTOM_MARGIN: f32 = 50.0;

/// The text flow engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFlow {
    pub line_spacing: f32,
    pub bottom_margin: f32,
}

impl Default for TextFlow {
    fn default() -> Self {
        Self {
            line_spacing: DEFAULT_LINE_SPACING,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
        }
    }
}

/// Greedily pack whitespace-separated words into lines no wider than
/// `max_width`
///
/// A single word wider than the line gets a line of its own and is never
/// split.
pub fn wrap(text: &str, metrics: &FontMetrics, size: f32, max_width: f32) -> Vec<String> {
    let space = metrics.string_width(" ", size);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0f32;

    for word in text.split_whitespace() {
        let word_width = metrics.string_width(word, size);
        if line.is_empty() {
            line.push_str(word);
            width = word_width;
        } else if width + space + word_width <= max_width {
            line.push(' ');
            line.push_str(word);
            width += space + word_width;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            width = word_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl TextFlow {
    pub fn new(line_spacing: f32, bottom_margin: f32) -> Self {
        Self {
            line_spacing,
            bottom_margin,
        }
    }

    /// Vertical distance between consecutive baselines
    pub fn line_pitch(&self, size: f32) -> f32 {
        self.line_spacing * size
    }

    /// Baseline of the first line on a continuation page
    pub fn continuation_top(&self, canvas: &Canvas) -> f32 {
        canvas.format().height - self.bottom_margin
    }

    /// Draw pre-wrapped lines starting at `cursor`, paginating whenever the
    /// next baseline would sit at or below the bottom margin
    ///
    /// Returns the cursor just below the last line.
    pub fn place_lines(
        &self,
        canvas: &mut Canvas,
        cursor: LayoutCursor,
        lines: &[String],
        face: FontFace,
        size: f32,
    ) -> Result<LayoutCursor, LayoutError> {
        let pitch = self.line_pitch(size);
        let mut cursor = cursor;

        for line in lines {
            if cursor.y <= self.bottom_margin {
                let page = canvas.page_after(cursor.page);
                cursor = LayoutCursor::new(page, cursor.x, self.continuation_top(canvas));
            }
            canvas.draw_text(cursor.page, cursor.x, cursor.y, line, face, size)?;
            cursor = cursor.down(pitch);
        }

        Ok(cursor)
    }

    /// Wrap `text` to `max_width` and flow it from `cursor` onwards
    pub fn insert_paragraph(
        &self,
        canvas: &mut Canvas,
        cursor: LayoutCursor,
        max_width: f32,
        face: FontFace,
        size: f32,
        text: &str,
    ) -> Result<LayoutCursor, LayoutError> {
        let metrics = face.metrics()?;
        let lines = wrap(text, &metrics, size, max_width);
        self.place_lines(canvas, cursor, &lines, face, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> std::sync::Arc<FontMetrics> {
        FontFace::Regular.metrics().unwrap()
    }

    #[test]
    fn test_wrap_respects_width_and_keeps_words() {
        let text = "O controle de temperatura foi realizado utilizando um sensor SONOFF \
                    com coleta em tempo real em intervalos médios de 3 minutos.";
        let metrics = metrics();
        let lines = wrap(text, &metrics, 10.0, 150.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.string_width(line, 10.0) <= 150.0, "{line} too wide");
            assert!(!line.is_empty());
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_never_splits_long_word() {
        let word = "Pneumoultramicroscopicossilicovulcanoconiótico";
        let lines = wrap(&format!("a {word} b"), &metrics(), 10.0, 40.0);
        assert_eq!(lines, vec!["a".to_string(), word.to_string(), "b".to_string()]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap("   \n\t ", &metrics(), 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_place_lines_paginates_at_bottom_margin() {
        let flow = TextFlow::default();
        let mut canvas = Canvas::default();
        let page = canvas.ensure_page();
        let lines: Vec<String> = (0..5).map(|i| format!("line {i}")).collect();

        // 80, 65 fit; 50 is at the margin and moves to the next page
        let end = flow
            .place_lines(
                &mut canvas,
                LayoutCursor::new(page, 25.0, 80.0),
                &lines,
                FontFace::Regular,
                10.0,
            )
            .unwrap();

        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.pages()[0].texts().count(), 2);
        assert_eq!(canvas.pages()[1].texts().count(), 3);
        assert_eq!(end.page, 1);

        let top = canvas.format().height - DEFAULT_BOTTOM_MARGIN;
        assert!((end.y - (top - 45.0)).abs() < 1e-3);
    }

    #[test]
    fn test_no_line_is_drawn_at_or_below_margin() {
        let flow = TextFlow::default();
        let mut canvas = Canvas::default();
        let page = canvas.ensure_page();
        let text = "palavra ".repeat(2000);

        flow.insert_paragraph(
            &mut canvas,
            LayoutCursor::new(page, 25.0, 300.0),
            550.0,
            FontFace::Regular,
            10.0,
            &text,
        )
        .unwrap();

        assert!(canvas.page_count() > 2);
        for page in canvas.pages() {
            for op in page.ops() {
                if let crate::layout::canvas::DrawOp::Text { y, .. } = op {
                    assert!(*y > DEFAULT_BOTTOM_MARGIN);
                }
            }
        }
        let words: usize = canvas
            .pages()
            .iter()
            .flat_map(|page| page.texts())
            .map(|line| line.split_whitespace().count())
            .sum();
        assert_eq!(words, 2000);
    }
}
