//! Indicator computation over an ascending candle window

pub mod momentum;
pub mod trend;

use crate::config::EngineConfig;
use crate::models::indicators::{Candle, IchimokuSeries};

pub use momentum::{calculate_rsi, calculate_rsi_series};
pub use trend::{calculate_ichimoku, IchimokuLines, IchimokuParams};

/// Compute every per-index series the signal layer reads.
///
/// `candles` must already be in ascending time order.
pub fn compute_indicators(candles: &[Candle], config: &EngineConfig) -> IchimokuSeries {
    let lines = calculate_ichimoku(candles, &IchimokuParams::from(config));
    IchimokuSeries {
        fast_line: lines.fast_line,
        slow_line: lines.slow_line,
        cloud_lead_a: lines.cloud_lead_a,
        cloud_lead_b: lines.cloud_lead_b,
        momentum: calculate_rsi_series(candles, config.momentum_period),
    }
}
