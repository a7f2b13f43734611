//! Pure statistics helpers behind the fixed derived metrics.

use crate::constants::analysis::HALFLIFE_MIN_POINTS;

/// Gini coefficient over non-negative values. Empty or all-zero input is 0.
pub fn gini(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let sum: f64 = sorted.iter().sum();
    if n == 0 || sum == 0.0 {
        return 0.0;
    }
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(idx, value)| (idx + 1) as f64 * value)
        .sum();
    (2.0 * weighted - (n as f64 + 1.0) * sum) / (n as f64 * sum)
}

/// Pearson correlation coefficient. `None` when either side has no variance
/// or fewer than two points.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Least-squares line fit returning `(slope, intercept)`. `None` when the
/// x-values carry no variance or fewer than two points are given.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x) * (x - mean_x);
    }
    if var_x == 0.0 {
        return None;
    }
    let slope = cov / var_x;
    Some((slope, mean_y - slope * mean_x))
}

/// Half-life of a decaying daily-count series via a log-linear fit.
///
/// Input points are `(days after peak, count)`. Zero-count days are excluded
/// (log-undefined). Requires at least `HALFLIFE_MIN_POINTS` usable points and
/// a strictly negative fitted slope; otherwise the half-life is undefined and
/// `None` is returned rather than a fabricated number.
pub fn log_linear_half_life(points: &[(f64, f64)]) -> Option<f64> {
    let usable: Vec<(f64, f64)> = points
        .iter()
        .filter(|(_, count)| *count > 0.0)
        .map(|(day, count)| (*day, count.ln()))
        .collect();
    if usable.len() < HALFLIFE_MIN_POINTS {
        return None;
    }
    let xs: Vec<f64> = usable.iter().map(|(day, _)| *day).collect();
    let ys: Vec<f64> = usable.iter().map(|(_, log)| *log).collect();
    let (slope, _) = linear_fit(&xs, &ys)?;
    if slope >= 0.0 {
        return None;
    }
    Some(std::f64::consts::LN_2 / -slope)
}

/// Median of a value slice. `None` for empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Min-max normalize a column to [0, 1]; a flat column maps to 0.5.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        values
            .iter()
            .map(|value| (value - min) / (max - min))
            .collect()
    } else {
        vec![0.5; values.len()]
    }
}
