//! Trend indicators: cloud bands and fast/slow trend lines

pub mod ichimoku;

pub use ichimoku::*;
