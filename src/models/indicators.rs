use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Sort a feed response into ascending time order.
///
/// Exchanges commonly return the newest candle first; every indicator in this
/// crate assumes index 0 is the oldest candle.
pub fn normalize_ascending(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    candles
}

/// Per-index indicator series. `None` marks an index without enough history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IchimokuSeries {
    pub fast_line: Vec<Option<f64>>,
    pub slow_line: Vec<Option<f64>>,
    pub cloud_lead_a: Vec<Option<f64>>,
    pub cloud_lead_b: Vec<Option<f64>>,
    pub momentum: Vec<Option<f64>>,
}

impl IchimokuSeries {
    pub fn len(&self) -> usize {
        self.fast_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fast_line.is_empty()
    }

    pub fn snapshot(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index >= self.len() {
            return None;
        }
        Some(IndicatorSnapshot {
            fast_line: self.fast_line[index],
            slow_line: self.slow_line[index],
            cloud_lead_a: self.cloud_lead_a[index],
            cloud_lead_b: self.cloud_lead_b[index],
            momentum: self.momentum[index],
        })
    }

    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fast_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_lead_a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_lead_b: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
}

impl IndicatorSnapshot {
    /// True when every value the classifier and decision rules read is present.
    pub fn is_complete(&self) -> bool {
        self.fast_line.is_some()
            && self.slow_line.is_some()
            && self.cloud_lead_a.is_some()
            && self.cloud_lead_b.is_some()
            && self.momentum.is_some()
    }
}
