//! Directional signal from price-vs-cloud, trend line ordering and momentum

use crate::config::EngineConfig;
use crate::models::signal::Signal;

/// Latest values the classifier looks at, all defined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierInput {
    pub close: f64,
    pub cloud_lead_a: f64,
    pub cloud_lead_b: f64,
    pub fast_line: f64,
    pub slow_line: f64,
    pub momentum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalClassifier {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl From<&EngineConfig> for SignalClassifier {
    fn from(config: &EngineConfig) -> Self {
        Self {
            overbought: config.overbought,
            oversold: config.oversold,
        }
    }
}

impl SignalClassifier {
    pub fn new(overbought: f64, oversold: f64) -> Self {
        Self {
            overbought,
            oversold,
        }
    }

    /// Buy/Sell only when all four conditions of a side hold
    pub fn classify(&self, input: &ClassifierInput) -> Signal {
        if self.is_buy(input) {
            Signal::Buy
        } else if self.is_sell(input) {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn is_buy(&self, input: &ClassifierInput) -> bool {
        let above_cloud = input.close > input.cloud_lead_a && input.close > input.cloud_lead_b;
        above_cloud && input.fast_line > input.slow_line && input.momentum < self.overbought
    }

    fn is_sell(&self, input: &ClassifierInput) -> bool {
        let below_cloud = input.close < input.cloud_lead_a && input.close < input.cloud_lead_b;
        below_cloud && input.fast_line < input.slow_line && input.momentum > self.oversold
    }
}
