//! Cloud indicator: fast/slow trend lines and the two forward-displaced leads
//!
//! fast  = midpoint(highest high, lowest low) over `fast_period`
//! slow  = midpoint(highest high, lowest low) over `slow_period`
//! lead A[i] = (fast[i - d] + slow[i - d]) / 2
//! lead B[i] = midpoint over `cloud_b_period`, taken at i - d
//!
//! The leads are computed from history and projected forward by the
//! displacement `d`, so a lead read at index i only uses candles <= i - d.

use crate::common::math;
use crate::config::EngineConfig;
use crate::models::indicators::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub cloud_b_period: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            fast_period: 9,
            slow_period: 26,
            cloud_b_period: 52,
            displacement: 26,
        }
    }
}

impl From<&EngineConfig> for IchimokuParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            fast_period: config.fast_period,
            slow_period: config.slow_period,
            cloud_b_period: config.cloud_b_period,
            displacement: config.displacement,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuLines {
    pub fast_line: Vec<Option<f64>>,
    pub slow_line: Vec<Option<f64>>,
    pub cloud_lead_a: Vec<Option<f64>>,
    pub cloud_lead_b: Vec<Option<f64>>,
}

/// Midpoint of the highest high and lowest low over a trailing window
pub fn midpoint_line(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let upper = math::rolling_max(&highs, period);
    let lower = math::rolling_min(&lows, period);
    upper
        .into_iter()
        .zip(lower)
        .map(|(hi, lo)| math::midpoint(hi, lo))
        .collect()
}

/// Compute all four cloud series for an ascending candle slice
pub fn calculate_ichimoku(candles: &[Candle], params: &IchimokuParams) -> IchimokuLines {
    let fast_line = midpoint_line(candles, params.fast_period);
    let slow_line = midpoint_line(candles, params.slow_period);

    let lead_a_base: Vec<Option<f64>> = fast_line
        .iter()
        .zip(&slow_line)
        .map(|(&f, &s)| math::midpoint(f, s))
        .collect();
    let lead_b_base = midpoint_line(candles, params.cloud_b_period);

    IchimokuLines {
        cloud_lead_a: math::shift_forward(&lead_a_base, params.displacement),
        cloud_lead_b: math::shift_forward(&lead_b_base, params.displacement),
        fast_line,
        slow_line,
    }
}
