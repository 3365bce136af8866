//! Font faces, glyph metrics and the process-wide font cache
//!
//! Reports use the two standard Helvetica faces, which every PDF viewer
//! provides, so only their metrics are embedded. Metrics come from AFM files
//! and are parsed at most once per process.

use crate::error::{ReportError, Result};
use crate::infrastructure::assets;
use crate::pdf::encoding::win_ansi_code;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Width used for characters missing from the metrics table
const FALLBACK_WIDTH: u16 = 556;

/// The two text faces used on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub fn from_bold(bold: bool) -> Self {
        if bold {
            Self::Bold
        } else {
            Self::Regular
        }
    }

    /// Embedded AFM asset carrying this face's metrics
    pub fn asset_path(&self) -> &'static str {
        match self {
            Self::Regular => assets::HELVETICA_AFM,
            Self::Bold => assets::HELVETICA_BOLD_AFM,
        }
    }

    /// PostScript name of the standard Type1 font
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Name under which the face is registered in page resources
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Metrics of this face from the global cache
    pub fn metrics(&self) -> Result<Arc<FontMetrics>> {
        FontCache::global().get(self.asset_path())
    }
}

/// Advance widths of one face in 1/1000 em, indexed by WinAnsi code
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    font_name: String,
    ascender: i16,
    descender: i16,
    widths: [u16; 256],
}

impl FontMetrics {
    /// Parse the subset of AFM this crate relies on
    pub fn parse_afm(path: &str, source: &str) -> Result<Self> {
        let mut font_name = None;
        let mut ascender = 0i16;
        let mut descender = 0i16;
        let mut widths = [0u16; 256];
        let mut glyphs = 0usize;
        let mut in_metrics = false;

        for line in source.lines().map(str::trim) {
            if line.starts_with("StartCharMetrics") {
                in_metrics = true;
                continue;
            }
            if line.starts_with("EndCharMetrics") {
                in_metrics = false;
                continue;
            }

            if in_metrics {
                if let Some((code, width)) = parse_char_metric(line) {
                    widths[usize::from(code)] = width;
                    glyphs += 1;
                }
                continue;
            }

            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "FontName" => font_name = Some(value.trim().to_string()),
                "Ascender" => ascender = parse_number(path, key, value)?,
                "Descender" => descender = parse_number(path, key, value)?,
                _ => {}
            }
        }

        let font_name = font_name.ok_or_else(|| ReportError::asset(path, "missing FontName"))?;
        if glyphs == 0 {
            return Err(ReportError::asset(path, "no character metrics"));
        }

        Ok(Self {
            font_name,
            ascender,
            descender,
            widths,
        })
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    pub fn descender(&self) -> i16 {
        self.descender
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_width(&self, ch: char) -> u16 {
        win_ansi_code(ch)
            .map(|code| self.widths[usize::from(code)])
            .filter(|width| *width > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }

    /// Rendered width of `text` in points at `size`
    pub fn string_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| u32::from(self.char_width(ch))).sum();
        units as f32 * size / 1000.0
    }
}

/// `C <code> ; WX <width> ; N <name> ;`; unencoded glyphs (`C -1`) are skipped
fn parse_char_metric(line: &str) -> Option<(u8, u16)> {
    let mut code = None;
    let mut width = None;
    for field in line.split(';').map(str::trim) {
        let mut parts = field.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("C"), Some(value)) => code = value.parse::<i32>().ok(),
            (Some("WX"), Some(value)) => width = value.parse::<f32>().ok(),
            _ => {}
        }
    }
    let code = u8::try_from(code?).ok()?;
    Some((code, width?.round() as u16))
}

fn parse_number(path: &str, key: &str, value: &str) -> Result<i16> {
    value
        .trim()
        .parse()
        .map_err(|e| ReportError::asset(path, format!("invalid {key}: {e}")))
}

/// Read-through cache of parsed metrics keyed by asset path
///
/// Populated lazily and never invalidated. Concurrent lookups take the read
/// lock; a miss parses outside the lock and the first writer wins.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: RwLock<HashMap<String, Arc<FontMetrics>>>,
}

static GLOBAL_FONT_CACHE: OnceLock<FontCache> = OnceLock::new();

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache shared by every report generated in this process
    pub fn global() -> &'static FontCache {
        GLOBAL_FONT_CACHE.get_or_init(FontCache::new)
    }

    pub fn get(&self, path: &str) -> Result<Arc<FontMetrics>> {
        if let Some(metrics) = self.fonts.read().get(path) {
            return Ok(Arc::clone(metrics));
        }

        let parsed = Arc::new(FontMetrics::parse_afm(path, assets::load_text(path)?)?);
        let mut fonts = self.fonts.write();
        let metrics = fonts.entry(path.to_string()).or_insert_with(|| {
            debug!(path, font = parsed.font_name(), "Loaded font metrics");
            Arc::clone(&parsed)
        });
        Ok(Arc::clone(metrics))
    }

    pub fn len(&self) -> usize {
        self.fonts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_widths() {
        let metrics = FontFace::Regular.metrics().unwrap();
        assert_eq!(metrics.font_name(), "Helvetica");
        assert_eq!(metrics.char_width(' '), 278);
        assert_eq!(metrics.char_width('A'), 667);
        assert_eq!(metrics.char_width('ç'), 500);
        assert_eq!(metrics.char_width('°'), 400);
        assert!((metrics.string_width("Dia", 10.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_bold_face_is_wider() {
        let regular = FontFace::Regular.metrics().unwrap();
        let bold = FontFace::Bold.metrics().unwrap();
        assert!(bold.string_width("Temperatura", 11.0) > regular.string_width("Temperatura", 11.0));
    }

    #[test]
    fn test_unknown_character_uses_fallback_width() {
        let metrics = FontFace::Regular.metrics().unwrap();
        assert_eq!(metrics.char_width('✓'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_cache_populates_once_per_path() {
        let cache = FontCache::new();
        let first = cache.get(assets::HELVETICA_AFM).unwrap();
        let second = cache.get(assets::HELVETICA_AFM).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_is_safe_for_concurrent_lookup() {
        let cache = Arc::new(FontCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let face = FontFace::from_bold(i % 2 == 0);
                    cache.get(face.asset_path()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_parse_rejects_metrics_without_glyphs() {
        let err = FontMetrics::parse_afm("broken.afm", "StartFontMetrics 4.1\nFontName X\n")
            .unwrap_err();
        assert!(matches!(err, ReportError::AssetLoad { .. }));
    }
}
