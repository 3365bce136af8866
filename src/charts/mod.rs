//! Raster charts of a reading series
//!
//! Both charts are drawn into an in-memory RGB buffer, the white background is
//! turned transparent, and the PNG is staged in a request-scoped temporary
//! file. Axis text is left to the document so the raster needs no fonts.

pub mod histogram;

pub use histogram::{Histogram, FREQUENCY_BINS};

use crate::domain::reading::{Reading, ReadingType};
use image::{ImageFormat, Rgba, RgbaImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::{Cursor, Write};
use std::ops::Range;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Reference raster size of both charts
pub const CHART_WIDTH: u32 = 339;
pub const CHART_HEIGHT: u32 = 169;

/// Series accent color
pub const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);

const GRID_COLOR: RGBColor = RGBColor(210, 210, 210);
const FRAME_COLOR: RGBColor = RGBColor(128, 128, 128);
const GRID_LINES: usize = 4;
const PLOT_MARGIN: u32 = 6;
/// Vertical padding above and below the trend line, as a share of its range
const TREND_PADDING: f64 = 0.05;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw {kind} chart: {reason}")]
    Draw { kind: ChartKind, reason: String },

    #[error("Failed to encode chart: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to stage chart file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Histogram of reading values
    Frequency,
    /// Reading values over time
    Trend,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::Trend => "trend",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered chart staged in a temporary PNG file
///
/// The file is deleted when the value is dropped.
#[derive(Debug)]
pub struct ChartImage {
    kind: ChartKind,
    file: NamedTempFile,
}

impl ChartImage {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.file.path())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    color: RGBColor,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(CHART_WIDTH, CHART_HEIGHT, DARK_BLUE)
    }
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32, color: RGBColor) -> Self {
        Self {
            width,
            height,
            color,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render one chart and stage it as a temporary PNG
    pub fn render(
        &self,
        kind: ChartKind,
        reading_type: ReadingType,
        readings: &[Reading],
    ) -> Result<ChartImage, ChartError> {
        let pixels = self.render_pixels(kind, readings)?;
        let png = encode_png(&pixels)?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("temp-{}-{}-chart", reading_type.as_str(), kind.as_str()))
            .suffix(".png")
            .tempfile()?;
        file.write_all(&png)?;
        file.flush()?;

        debug!(
            chart = %kind,
            reading_type = %reading_type,
            bytes = png.len(),
            path = %file.path().display(),
            "Rendered chart"
        );

        Ok(ChartImage { kind, file })
    }

    /// Frequency and trend charts, in that order
    pub fn render_both(
        &self,
        reading_type: ReadingType,
        readings: &[Reading],
    ) -> Result<(ChartImage, ChartImage), ChartError> {
        let frequency = self.render(ChartKind::Frequency, reading_type, readings)?;
        let trend = self.render(ChartKind::Trend, reading_type, readings)?;
        Ok((frequency, trend))
    }

    /// Chart pixels with a transparent background
    pub fn render_pixels(&self, kind: ChartKind, readings: &[Reading]) -> Result<RgbaImage, ChartError> {
        let mut buffer = vec![0u8; (self.width as usize) * (self.height as usize) * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (self.width, self.height)).into_drawing_area();
            let drawn = match kind {
                ChartKind::Frequency => {
                    let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
                    draw_frequency(&root, Histogram::new(&values, FREQUENCY_BINS).as_ref(), self.color)
                }
                ChartKind::Trend => {
                    let points: Vec<(f64, f64)> = readings
                        .iter()
                        .map(|r| (r.timestamp.timestamp_millis() as f64, r.value))
                        .collect();
                    draw_trend(&root, &points, self.color)
                }
            };
            drawn.map_err(|e| ChartError::Draw {
                kind,
                reason: e.to_string(),
            })?;
        }

        Ok(transparent_background(&buffer, self.width, self.height))
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ChartError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn transparent_background(rgb: &[u8], width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let offset = ((y as usize) * (width as usize) + x as usize) * 3;
        let (r, g, b) = (rgb[offset], rgb[offset + 1], rgb[offset + 2]);
        let alpha = if (r, g, b) == (255, 255, 255) { 0 } else { 255 };
        Rgba([r, g, b, alpha])
    })
}

/// Range that never collapses to a single point
fn span(min: f64, max: f64) -> Range<f64> {
    if max > min {
        min..max
    } else {
        (min - 0.5)..(max + 0.5)
    }
}

fn trend_ranges(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    if points.is_empty() {
        return (0.0..1.0, 0.0..1.0);
    }
    let (x_min, x_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
    let (y_min, y_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));

    let y = span(y_min, y_max);
    let padding = (y.end - y.start) * TREND_PADDING;
    (span(x_min, x_max), (y.start - padding)..(y.end + padding))
}

fn draw_grid<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: Range<f64>,
    y: Range<f64>,
) -> Result<ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>, DrawingAreaErrorKind<DB::ErrorType>>
{
    let mut chart = ChartBuilder::on(area)
        .margin(PLOT_MARGIN)
        .build_cartesian_2d(x.clone(), y.clone())?;

    let step = (y.end - y.start) / GRID_LINES as f64;
    chart.draw_series((1..GRID_LINES).map(|i| {
        let level = y.start + step * i as f64;
        PathElement::new(vec![(x.start, level), (x.end, level)], GRID_COLOR.stroke_width(1))
    }))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (x.start, y.start),
            (x.end, y.start),
            (x.end, y.end),
            (x.start, y.end),
            (x.start, y.start),
        ],
        FRAME_COLOR.stroke_width(1),
    )))?;

    Ok(chart)
}

fn draw_trend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    color: RGBColor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    area.fill(&WHITE)?;
    let (x, y) = trend_ranges(points);
    let mut chart = draw_grid(area, x, y)?;
    chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(1)))?;
    area.present()
}

fn draw_frequency<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    histogram: Option<&Histogram>,
    color: RGBColor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    area.fill(&WHITE)?;
    let (x, top) = match histogram {
        Some(histogram) => (histogram.lower()..histogram.upper(), histogram.max_count().max(1)),
        None => (0.0..1.0, 1),
    };
    let mut chart = draw_grid(area, x, 0.0..(top as f64 * 1.05))?;

    if let Some(histogram) = histogram {
        chart.draw_series(histogram.counts().iter().enumerate().map(|(index, count)| {
            let (start, end) = histogram.bin_range(index);
            Rectangle::new([(start, 0.0), (end, *count as f64)], color.filled())
        }))?;
    }
    area.present()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn readings(count: i64) -> Vec<Reading> {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 3, 0, 0).unwrap();
        (0..count)
            .map(|i| Reading::new(start + Duration::minutes(3 * i), 4.0 + (i % 7) as f64 * 0.5))
            .collect()
    }

    // blended edges of the series are still clearly blue; grid and frame are gray
    fn has_series_pixels(image: &RgbaImage) -> bool {
        image
            .pixels()
            .any(|p| p.0[3] == 255 && u16::from(p.0[2]) > u16::from(p.0[0]) + 40)
    }

    #[test]
    fn test_charts_have_reference_size_and_transparent_background() {
        let renderer = ChartRenderer::default();
        for kind in [ChartKind::Frequency, ChartKind::Trend] {
            let image = renderer.render_pixels(kind, &readings(50)).unwrap();
            assert_eq!(image.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
            assert_eq!(image.get_pixel(0, 0).0[3], 0, "{kind} corner not transparent");
            assert!(has_series_pixels(&image), "{kind} has no series pixels");
        }
    }

    #[test]
    fn test_chart_file_is_removed_on_drop() {
        let renderer = ChartRenderer::default();
        let chart = renderer
            .render(ChartKind::Trend, ReadingType::Humidity, &readings(20))
            .unwrap();

        let path = chart.path().to_path_buf();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("temp-humidity-trend-chart"));
        assert!(name.ends_with(".png"));

        let bytes = chart.read_bytes().unwrap();
        assert!(image::load_from_memory(&bytes).is_ok());

        drop(chart);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_series_still_renders() {
        let renderer = ChartRenderer::default();
        let (frequency, trend) = renderer.render_both(ReadingType::Temperature, &[]).unwrap();
        assert_eq!(frequency.kind(), ChartKind::Frequency);
        assert_eq!(trend.kind(), ChartKind::Trend);
    }

    #[test]
    fn test_trend_range_is_not_forced_through_zero() {
        let (_, y) = trend_ranges(&[(0.0, 18.0), (1.0, 22.0)]);
        assert!(y.start > 17.0);
        assert!(y.end < 23.0);
    }
}
