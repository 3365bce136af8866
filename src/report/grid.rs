//! Daily metrics grid: one row per calendar day of the report period
//!
//! Rows grow downwards from a fixed origin. The grid never paginates; the
//! two-week period cap keeps it on the first page, and a grid that would
//! cross the bottom margin is only logged.

use crate::analytics::bucketing::DayPeriod;
use crate::analytics::format::decimal;
use crate::analytics::statistics::DayStatistics;
use crate::analytics::ReportAnalytics;
use crate::domain::period::ReportPeriod;
use crate::layout::canvas::{Canvas, LayoutError};
use crate::layout::fonts::FontFace;
use crate::layout::geometry::{LayoutCursor, Rect};
use crate::report::constants::{grid, paragraph};
use chrono::Datelike;
use tracing::warn;

/// A text column of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridColumn {
    Day,
    Period(DayPeriod),
    Max,
    Min,
    StdDev,
}

impl GridColumn {
    /// Text x position of the column
    pub fn text_x(&self) -> f32 {
        match self {
            Self::Day => grid::DAY_X,
            Self::Period(period) => grid::PERIOD_X[period.index()],
            Self::Max => grid::MAX_X,
            Self::Min => grid::MIN_X,
            Self::StdDev => grid::STD_DEV_X,
        }
    }
}

/// Bottom edge of row `index`
pub fn row_bottom(index: usize) -> f32 {
    grid::INITIAL_Y - grid::ROW_HEIGHT * index as f32
}

/// Text baseline of row `index`
pub fn row_baseline(index: usize) -> f32 {
    row_bottom(index) + grid::BASELINE_OFFSET
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsGrid;

impl MetricsGrid {
    /// Draw `days` rows of cell borders and return the cursor one row below
    /// the last row
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        cursor: LayoutCursor,
        days: usize,
    ) -> Result<LayoutCursor, LayoutError> {
        for row in 0..days {
            let y = row_bottom(row);
            for (x, width) in grid::CELLS {
                canvas.draw_rect(
                    cursor.page,
                    Rect::new(x, y, width, grid::ROW_HEIGHT),
                    grid::LINE_WIDTH,
                )?;
            }
        }

        let bottom = row_bottom(days);
        if bottom <= paragraph::BOTTOM_MARGIN {
            warn!(
                days,
                bottom, "Metrics grid crosses the bottom margin of the first page"
            );
        }
        Ok(cursor.at(grid::CELLS[0].0, bottom))
    }

    /// Write the grid title and one row of figures per period day
    ///
    /// Days without readings keep only their day label.
    pub fn fill(
        &self,
        canvas: &mut Canvas,
        cursor: LayoutCursor,
        title: &str,
        period: &ReportPeriod,
        analytics: &ReportAnalytics,
    ) -> Result<LayoutCursor, LayoutError> {
        canvas.draw_text(
            cursor.page,
            grid::TITLE_X,
            grid::TITLE_Y,
            title,
            FontFace::Bold,
            grid::FONT_SIZE,
        )?;

        for (row, date) in period.days().enumerate() {
            let baseline = row_baseline(row);
            let mut cell = |column: GridColumn, text: &str| {
                canvas.draw_text(
                    cursor.page,
                    column.text_x(),
                    baseline,
                    text,
                    FontFace::Regular,
                    grid::FONT_SIZE,
                )
            };

            cell(GridColumn::Day, &date.day().to_string())?;
            if let Some(stats) = analytics.day(date) {
                for (column, value) in row_values(stats) {
                    cell(column, &decimal(value))?;
                }
            }
        }

        Ok(cursor.with_y(row_bottom(period.number_of_days())))
    }
}

/// Figures of one day by column; periods without readings are omitted
pub fn row_values(stats: &DayStatistics) -> Vec<(GridColumn, f64)> {
    let mut values: Vec<(GridColumn, f64)> = stats
        .period_means
        .iter()
        .map(|(period, mean)| (GridColumn::Period(*period), *mean))
        .collect();
    values.push((GridColumn::Max, stats.max));
    values.push((GridColumn::Min, stats.min));
    values.push((GridColumn::StdDev, stats.std_dev));
    values
}
