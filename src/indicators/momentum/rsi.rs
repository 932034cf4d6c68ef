//! RSI (Relative Strength Index) indicator
//!
//! Wilder smoothing of average gains and losses, seeded with a simple average
//! of the first `period` changes.
//!
//! RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss

use crate::models::indicators::Candle;

/// Per-index RSI. Index `i` is defined once `period` changes are available,
/// i.e. from index `period` onwards.
pub fn calculate_rsi_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let n = candles.len();
    let mut result = vec![None; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = candles[i].close - candles[i - 1].close;
        if change.is_nan() {
            return result;
        }
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = Some(rsi_value(avg_gain, avg_loss));

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let change = candles[i].close - candles[i - 1].close;
        if change.is_nan() {
            // Smoothing cannot recover from a gap; later values stay undefined
            break;
        }
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    result
}

/// Latest RSI value for the slice
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Option<f64> {
    calculate_rsi_series(candles, period).last().copied().flatten()
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<f64> {
    calculate_rsi(candles, 14)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
