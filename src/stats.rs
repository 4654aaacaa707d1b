//! Descriptive statistics used while building series.
//!
//! Everything here is a pure function over `f64` slices. Empty input never
//! panics; it yields `None` or an empty result.

use statrs::distribution::{ContinuousCDF, StudentsT};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

pub fn std_error(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sample_std_dev(values) / (values.len() as f64).sqrt()
}

/// Linear-interpolated quantile of already sorted data, `p` in [0, 1]
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 { return 0.0; }
    if n == 1 { return sorted_data[0]; }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Interquartile range, Q3 - Q1
pub fn iqr(values: &[f64]) -> f64 {
    let s = sorted(values);
    percentile(&s, 0.75) - percentile(&s, 0.25)
}

/// Two-sided Student-t critical value for a confidence level in percent.
/// Falls back to the normal approximation when the t distribution cannot be built.
pub fn t_critical(confidence_percent: f64, deg_freedom: f64) -> f64 {
    let level = (confidence_percent / 100.0).clamp(0.0, 0.999_999);
    let p = 0.5 + level / 2.0;
    match StudentsT::new(0.0, 1.0, deg_freedom) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => normal_quantile(p),
    }
}

/// Half-width of the confidence interval around the mean
pub fn ci_half_width(values: &[f64], confidence_percent: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    t_critical(confidence_percent, (n - 1) as f64) * std_error(values)
}

/// Standard normal quantile (Acklam's rational approximation)
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e1, 2.209460984245205e2, -2.759285104469687e2,
        1.383577518672690e2, -3.066479806614716e1, 2.506628277459239,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e1, 1.615858368580409e2, -1.556989798598866e2,
        6.680131188771972e1, -1.328068155288572e1,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-3, -3.223964580411365e-1, -2.400758277161838,
        -2.549732539343734, 4.374664141464968, 2.938163982698783,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-3, 3.224671290700398e-1, 2.445134137142996, 3.754408661907416,
    ];
    const P_LOW: f64 = 0.02425;

    let p = p.clamp(1e-12, 1.0 - 1e-12);
    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -normal_quantile(1.0 - p)
    }
}

/// Tukey five-number summary with 1.5 IQR whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let ys = sorted(values);

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    // Whiskers: range of data within fences
    let lower_whisker = ys.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
    let upper_whisker = ys.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);

    let outliers = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Some(BoxSummary { lower_whisker, q1, median, q3, upper_whisker, outliers })
}

/// Silverman's rule of thumb for bandwidth selection
pub fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if n < 2.0 { return 1.0; }

    let std_dev = sample_std_dev(data);
    let iqr = iqr(data);

    // h = 0.9 * min(std, IQR/1.34) * n^(-1/5)
    let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
    if scale <= 0.0 { return 1.0; }
    0.9 * scale * n.powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Gaussian KDE evaluated on an evenly spaced grid.
/// Returns `(grid, density)` with density normalised to a peak of 1.
pub fn kde(data: &[f64], bandwidth: f64, grid_points: usize) -> (Vec<f64>, Vec<f64>) {
    let n = data.len() as f64;
    if n == 0.0 || grid_points == 0 { return (vec![], vec![]); }

    let min_y = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Extend range slightly for smooth edges
    let extend = 3.0 * bandwidth;
    let y_start = min_y - extend;
    let y_end = max_y + extend;

    let range = y_end - y_start;
    if range <= 0.0 || grid_points == 1 { return (vec![min_y], vec![1.0]); }

    let step = range / (grid_points - 1) as f64;
    let mut grid = Vec::with_capacity(grid_points);
    let mut density = Vec::with_capacity(grid_points);

    for i in 0..grid_points {
        let y = y_start + i as f64 * step;
        grid.push(y);
        let d: f64 = data.iter().map(|&xi| gaussian_kernel((y - xi) / bandwidth)).sum();
        density.push(d / (n * bandwidth));
    }

    let max_density = density.iter().copied().fold(0.0f64, f64::max);
    if max_density > 0.0 {
        for d in &mut density {
            *d /= max_density;
        }
    }

    (grid, density)
}

/// One histogram bin
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Square-root rule, clamped to [1, 50]
pub fn default_bin_count(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).clamp(1, 50)
}

/// Equal-width bins over [min, max]. The max value lands in the last bin.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<Bin> {
    if values.is_empty() || bin_count == 0 {
        return vec![];
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let range = max - min;
    let width = if range == 0.0 { 1.0 } else { range / bin_count as f64 };

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Least-squares fit `y = slope * x + intercept`. `None` for fewer than two
/// points or a vertical point cloud.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let sum_x: f64 = xs[..n].iter().sum();
    let sum_y: f64 = ys[..n].iter().sum();
    let sum_xx: f64 = xs[..n].iter().map(|&x| x * x).sum();
    let sum_xy: f64 = xs[..n].iter().zip(&ys[..n]).map(|(&x, &y)| x * y).sum();

    let denom = n_f * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;
    Some((slope, intercept))
}
