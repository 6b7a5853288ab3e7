// Numeric helpers used across the indicator code.

/// Percentage change from `base` to `value`; `None` when either side is missing or the base is zero.
pub fn pct_change(value: Option<f64>, base: Option<f64>) -> Option<f64> {
    match (value, base) {
        (Some(v), Some(b)) if b != 0.0 => Some((v - b) / b * 100.0),
        _ => None,
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation dividing by `n` (Bollinger convention).
pub fn population_stdev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let var = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.max(0.0).sqrt())
}

/// Standard deviation dividing by `n - 1`; needs at least two values.
pub fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let var = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.max(0.0).sqrt())
}
