//! Candle fixtures shared by unit and integration tests.
//!
//! All candles have zero range (open = high = low = close) so the trend lines
//! are plain midpoints of closing prices and easy to reason about.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use kumo::models::indicators::Candle;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn flat_candle(price: f64, index: usize) -> Candle {
    Candle::new(
        price,
        price,
        price,
        price,
        1.0,
        base_time() + Duration::minutes(15 * index as i64),
    )
}

/// Ascending candles from a list of closes, 15 minutes apart
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &p)| flat_candle(p, i))
        .collect()
}

/// Closes for a confirmed upside break, last index 92:
/// - 0..=79: ranging 98/102
/// - 80..=88: tighter range 99/100.5
/// - 89..=92: rise to 105
///
/// At the last candle the fast line (102) sits above the slow line (101.5),
/// four candles earlier it was below (99.75 vs 100). Close 105 is above both
/// cloud leads (100) and momentum ends in the mid 50s.
pub fn breakout_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(93);
    for i in 0..80 {
        closes.push(if i % 2 == 0 { 98.0 } else { 102.0 });
    }
    for i in 80..89 {
        closes.push(if (i - 80) % 2 == 0 { 99.0 } else { 100.5 });
    }
    closes.extend_from_slice(&[100.5, 102.0, 103.5, 105.0]);
    closes
}

/// The breakout followed by four candles holding near the high, so the fast
/// line is above the slow line at both ends of the persistence window.
pub fn held_breakout_closes() -> Vec<f64> {
    let mut closes = breakout_closes();
    closes.extend_from_slice(&[104.5, 105.0, 104.5, 105.0]);
    closes
}

/// Price-mirrored series: every level `p` becomes `200 - p`
pub fn mirrored(closes: &[f64]) -> Vec<f64> {
    closes.iter().map(|p| 200.0 - p).collect()
}

pub fn scaled(closes: &[f64], factor: f64) -> Vec<f64> {
    closes.iter().map(|p| p * factor).collect()
}

pub fn breakout_candles() -> Vec<Candle> {
    candles_from_closes(&breakout_closes())
}

pub fn breakdown_candles() -> Vec<Candle> {
    candles_from_closes(&mirrored(&breakout_closes()))
}

/// `n` candles ranging 98/102
pub fn ranging_candles(n: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..n)
        .map(|i| if i % 2 == 0 { 98.0 } else { 102.0 })
        .collect();
    candles_from_closes(&closes)
}

/// Append a still-forming candle one interval after the last one
pub fn with_forming_candle(mut candles: Vec<Candle>, price: f64) -> Vec<Candle> {
    let index = candles.len();
    candles.push(flat_candle(price, index));
    candles
}
