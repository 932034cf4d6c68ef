//! Signal evaluation: cross detection, classification, decision rules, sizing.

pub mod classifier;
pub mod cross;
pub mod decision;
pub mod engine;
pub mod sizing;

pub use classifier::{ClassifierInput, SignalClassifier};
pub use cross::CrossDetector;
pub use decision::{decide, Decision, DecisionInput, DecisionRule};
pub use engine::{evaluate_cycle, CycleEvaluation, SignalEngine, INSUFFICIENT_DATA, MIN_CANDLES};
pub use sizing::{position_size, SizingError};
