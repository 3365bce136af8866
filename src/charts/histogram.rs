//! Fixed-width frequency bins

/// Bin count of the frequency chart
pub const FREQUENCY_BINS: usize = 10;

/// Half-width of the value range used when every sample is identical
const DEGENERATE_HALF_WIDTH: f64 = 0.5;

/// Equal-width bins over `[lower, upper]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` buckets spanning their observed range
    ///
    /// The maximum value falls into the last bin. Returns `None` when there
    /// are no finite values or `bins` is zero.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let min = finite.iter().copied().reduce(f64::min)?;
        let max = finite.iter().copied().reduce(f64::max)?;

        let (lower, upper) = if max > min {
            (min, max)
        } else {
            (min - DEGENERATE_HALF_WIDTH, max + DEGENERATE_HALF_WIDTH)
        };

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0usize; bins];
        for value in finite {
            let index = (((value - lower) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        Some(Self {
            lower,
            upper,
            counts,
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// `[start, end)` of bin `index`
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let start = self.lower + self.bin_width() * index as f64;
        (start, start + self.bin_width())
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_is_counted_once() {
        let values: Vec<f64> = (0..=100).map(|v| v as f64 / 10.0).collect();
        let histogram = Histogram::new(&values, FREQUENCY_BINS).unwrap();

        assert_eq!(histogram.counts().len(), 10);
        assert_eq!(histogram.total(), values.len());
        assert_eq!(histogram.lower(), 0.0);
        assert_eq!(histogram.upper(), 10.0);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let histogram = Histogram::new(&[0.0, 10.0], FREQUENCY_BINS).unwrap();
        assert_eq!(histogram.counts()[0], 1);
        assert_eq!(histogram.counts()[9], 1);
    }

    #[test]
    fn test_identical_values_get_unit_range() {
        let histogram = Histogram::new(&[4.0; 12], FREQUENCY_BINS).unwrap();
        assert_eq!(histogram.lower(), 3.5);
        assert_eq!(histogram.upper(), 4.5);
        assert_eq!(histogram.total(), 12);
        assert_eq!(histogram.max_count(), 12);
    }

    #[test]
    fn test_empty_or_non_finite_input() {
        assert!(Histogram::new(&[], FREQUENCY_BINS).is_none());
        assert!(Histogram::new(&[f64::NAN], FREQUENCY_BINS).is_none());
        assert!(Histogram::new(&[1.0], 0).is_none());
    }

    #[test]
    fn test_bin_ranges_tile_the_domain() {
        let histogram = Histogram::new(&[2.0, 8.0], 3).unwrap();
        assert_eq!(histogram.bin_range(0), (2.0, 4.0));
        assert_eq!(histogram.bin_range(2), (6.0, 8.0));
    }
}
