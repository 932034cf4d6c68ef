//! Fast/slow trend line cross detection with a persistence window.
//!
//! The latest ordering of the two lines is compared with their ordering
//! `persistence` candles earlier instead of on the previous candle. A crossing
//! therefore stays reported for `persistence` candles after it happens and a
//! brief re-cross inside the window does not cancel it, as long as the
//! ordering at both ends of the window differs.

use crate::models::signal::CrossEvent;

pub const DEFAULT_PERSISTENCE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossDetector {
    persistence: usize,
}

impl Default for CrossDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PERSISTENCE)
    }
}

impl CrossDetector {
    pub fn new(persistence: usize) -> Self {
        Self {
            persistence: persistence.max(1),
        }
    }

    pub fn persistence(&self) -> usize {
        self.persistence
    }

    /// Classify the crossing between the last index and `persistence` indices
    /// before it. Missing values on either end yield `CrossEvent::None`.
    pub fn detect(&self, fast: &[Option<f64>], slow: &[Option<f64>]) -> CrossEvent {
        let len = fast.len().min(slow.len());
        if len <= self.persistence {
            return CrossEvent::None;
        }
        let last = len - 1;
        let prior = last - self.persistence;

        let (Some(fast_now), Some(slow_now), Some(fast_then), Some(slow_then)) =
            (fast[last], slow[last], fast[prior], slow[prior])
        else {
            return CrossEvent::None;
        };

        if fast_now > slow_now && fast_then <= slow_then {
            CrossEvent::Bullish
        } else if fast_now < slow_now && fast_then >= slow_then {
            CrossEvent::Bearish
        } else {
            CrossEvent::None
        }
    }
}
