//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod intent;
pub mod position;
pub mod signal;

pub use indicators::{Candle, IchimokuSeries, IndicatorSnapshot};
pub use intent::{DecisionContext, DecisionRecord, OrderAction, OrderIntent};
pub use position::{PositionSide, PositionState};
pub use signal::{CrossEvent, Signal};
