//! Kumo - cloud-trend trading decision engine
//!
//! Computes cloud bands, fast/slow trend lines and a momentum oscillator from
//! a candle window, classifies a directional signal and turns it into a single
//! order intent per polling cycle.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use config::EngineConfig;
pub use models::{Candle, CrossEvent, OrderAction, OrderIntent, PositionSide, PositionState, Signal};
pub use signals::engine::evaluate_cycle;
