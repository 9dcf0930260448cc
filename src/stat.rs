//! Derived statistics shared by the renderers: means, Pearson correlation,
//! cumulative sums, percentiles, equal-width binning and Gaussian KDE.

use anyhow::{bail, Result};

/// Arithmetic mean. Empty input yields NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient of two paired samples.
///
/// Degenerate inputs (fewer than two pairs, zero variance) yield NaN
/// rather than an error, matching what dataframe libraries report.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        bail!(
            "Correlation requires equal-length samples (x: {}, y: {})",
            x.len(),
            y.len()
        );
    }
    let n = x.len() as f64;
    if x.len() < 2 {
        return Ok(f64::NAN);
    }

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|&v| v * v).sum();
    let sum_yy: f64 = y.iter().map(|&v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(&a, &b)| a * b).sum();

    let cov = n * sum_xy - sum_x * sum_y;
    let var_x = n * sum_xx - sum_x * sum_x;
    let var_y = n * sum_yy - sum_y * sum_y;

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Ok(f64::NAN);
    }
    Ok(cov / denom)
}

/// Running total over the input order.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|&v| {
            total += v;
            total
        })
        .collect()
}

/// Linear-interpolated percentile of pre-sorted data, p in [0, 1].
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

/// Equal-width bin counts over the data's own range.
#[derive(Debug, Clone)]
pub struct Bins {
    /// Left edge of the first bin
    pub start: f64,
    /// Width of every bin
    pub width: f64,
    /// Count per bin, in order
    pub counts: Vec<usize>,
}

impl Bins {
    /// Center of bin `idx`.
    pub fn center(&self, idx: usize) -> f64 {
        self.start + (idx as f64 + 0.5) * self.width
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin values into `bin_count` equal-width bins spanning [min, max].
pub fn bin_values(values: &[f64], bin_count: usize) -> Result<Bins> {
    if bin_count == 0 {
        bail!("Bin count must be at least 1");
    }
    if values.is_empty() {
        bail!("Cannot bin an empty set of values");
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let range = max - min;
    let width = if range == 0.0 { 1.0 } else { range / bin_count as f64 };

    let mut counts = vec![0usize; bin_count];
    for &v in values {
        // The maximum lands exactly on the right edge; clamp into the last bin
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    Ok(Bins {
        start: min,
        width,
        counts,
    })
}

/// Five-number summary with 1.5·IQR whiskers.
#[derive(Debug, Clone)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Result<BoxStats> {
    if values.is_empty() {
        bail!("Cannot compute box statistics for an empty set of values");
    }

    let mut ys = values.to_vec();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    // Whiskers: extreme data values still inside the fences
    let lower_whisker = ys
        .iter()
        .filter(|&&v| v >= lower_fence)
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let upper_whisker = ys
        .iter()
        .filter(|&&v| v <= upper_fence)
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    let outliers: Vec<f64> = ys
        .iter()
        .filter(|&&v| v < lower_fence || v > upper_fence)
        .cloned()
        .collect();

    Ok(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Silverman's rule of thumb for KDE bandwidth selection
fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if n < 2.0 {
        return 1.0;
    }

    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;

    // h = 0.9 * min(std, IQR/1.34) * n^(-1/5)
    let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
    if scale <= 0.0 {
        return 1.0;
    }
    0.9 * scale * n.powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Gaussian KDE sampled on a 128-point grid, density normalized to [0, 1].
///
/// Returns (grid positions, normalized density).
pub fn kde_curve(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    const GRID_POINTS: usize = 128;

    let n = data.len() as f64;
    if n == 0.0 {
        return (vec![], vec![]);
    }

    let bandwidth = silverman_bandwidth(data);

    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Extend range for smooth edges
    let extend = 3.0 * bandwidth;
    let start = min - extend;
    let end = max + extend;

    let range = end - start;
    if range <= 0.0 {
        return (vec![min], vec![1.0]);
    }

    let step = range / (GRID_POINTS - 1) as f64;
    let mut grid = Vec::with_capacity(GRID_POINTS);
    let mut density = Vec::with_capacity(GRID_POINTS);

    for i in 0..GRID_POINTS {
        let x = start + i as f64 * step;
        grid.push(x);

        let mut d = 0.0;
        for &xi in data {
            let u = (x - xi) / bandwidth;
            d += gaussian_kernel(u);
        }
        d /= n * bandwidth;
        density.push(d);
    }

    let max_density = density.iter().fold(0.0f64, |a, &b| a.max(b));
    if max_density > 0.0 {
        for d in &mut density {
            *d /= max_density;
        }
    }

    (grid, density)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![3.0, 2.0, 1.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        // Hand-computed: cov = 40, var_x = var_y = 50, r = 0.8
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        assert!(pearson(&[1.0], &[2.0]).unwrap().is_nan());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap().is_nan());
    }

    #[test]
    fn test_pearson_length_mismatch() {
        let result = pearson(&[1.0, 2.0], &[1.0]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("equal-length"));
    }

    #[test]
    fn test_cumulative_sum_descending_values() {
        assert_eq!(
            cumulative_sum(&[40.0, 30.0, 20.0, 10.0]),
            vec![40.0, 70.0, 90.0, 100.0]
        );
    }

    #[test]
    fn test_percentile() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 0.5), 2.5);
        assert_eq!(percentile(&data, 1.0), 4.0);
    }

    #[test]
    fn test_bin_values() {
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let bins = bin_values(&values, 5).unwrap();
        assert_eq!(bins.counts.len(), 5);
        assert_eq!(bins.counts.iter().sum::<usize>(), values.len());
        assert_eq!(bins.start, 0.0);
        assert_eq!(bins.width, 2.0);
        // 10.0 sits on the right edge and lands in the last bin
        assert_eq!(bins.counts[4], 2);
    }

    #[test]
    fn test_bin_values_constant_column() {
        let bins = bin_values(&[5.0, 5.0, 5.0], 4).unwrap();
        assert_eq!(bins.width, 1.0);
        assert_eq!(bins.counts[0], 3);
    }

    #[test]
    fn test_bin_values_empty() {
        assert!(bin_values(&[], 10).is_err());
        assert!(bin_values(&[1.0], 0).is_err());
    }

    #[test]
    fn test_box_stats() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert!(stats.q1 < stats.median && stats.median < stats.q3);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn test_kde_curve_normalized() {
        let data = vec![1.0, 2.0, 2.0, 3.0, 4.0];
        let (grid, density) = kde_curve(&data);
        assert_eq!(grid.len(), 128);
        assert_eq!(density.len(), 128);
        let max = density.iter().cloned().fold(0.0f64, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kde_curve_single_value() {
        let (grid, density) = kde_curve(&[3.0]);
        assert!(!grid.is_empty());
        assert_eq!(grid.len(), density.len());
    }
}
