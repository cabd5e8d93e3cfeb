//! Descriptive statistics shared by the performance metrics.
//!
//! Empty input yields 0.0 rather than NaN. Standard deviation and variance are
//! population estimators unless the name says otherwise.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Covariance with the `n - 1` denominator; 0.0 for fewer than two pairs.
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (mx, my) = (mean(xs), mean(ys));
    xs.iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / (n - 1) as f64
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let v = sorted(values);
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (v.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    v[lo] + (v[hi] - v[lo]) * frac
}

/// Bias-corrected sample skewness, `n / ((n-1)(n-2)) * Σ z³` with population z-scores.
/// 0.0 for fewer than three values or zero spread.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let (m, sd) = (mean(values), std_dev(values));
    if sd == 0.0 {
        return 0.0;
    }
    let n = n as f64;
    let sum: f64 = values.iter().map(|x| ((x - m) / sd).powi(3)).sum();
    n / ((n - 1.0) * (n - 2.0)) * sum
}

/// Bias-corrected excess kurtosis. 0.0 for fewer than four values or zero spread.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return 0.0;
    }
    let (m, sd) = (mean(values), std_dev(values));
    if sd == 0.0 {
        return 0.0;
    }
    let n = n as f64;
    let sum: f64 = values.iter().map(|x| ((x - m) / sd).powi(4)).sum();
    n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * sum
        - 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0))
}

/// Replace NaN and ±∞ with `default`.
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value } else { default }
}
