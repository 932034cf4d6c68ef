use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional signal from the cloud/trend/momentum classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Fast/slow trend line crossing within the persistence window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossEvent {
    /// Golden cross: fast line moved above the slow line
    Bullish,
    /// Death cross: fast line moved below the slow line
    Bearish,
    #[default]
    None,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

impl fmt::Display for CrossEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossEvent::Bullish => write!(f, "golden_cross"),
            CrossEvent::Bearish => write!(f, "death_cross"),
            CrossEvent::None => write!(f, "none"),
        }
    }
}
