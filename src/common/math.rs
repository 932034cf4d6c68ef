//! Rolling-window and rounding helpers used by the indicators and sizing

/// Highest value of each trailing window of `period` elements.
///
/// Index `i` is `None` until `period` values ending at `i` are available.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, f64::max)
}

/// Lowest value of each trailing window of `period` elements.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, f64::min)
}

fn rolling(values: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = window.iter().copied().reduce(pick);
    }
    out
}

/// Shift a series forward by `offset` positions, padding the head with `None`.
///
/// Output index `i` holds input index `i - offset`; the tail that would land
/// past the end of the series is dropped.
pub fn shift_forward(series: &[Option<f64>], offset: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let mut out = vec![None; n];
    for i in offset..n {
        out[i] = series[i - offset];
    }
    out
}

/// Average of two optional values, `None` if either is missing
pub fn midpoint(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? + b?) / 2.0)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
