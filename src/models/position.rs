//! Externally owned position snapshot.
//!
//! The engine reads one of these per cycle and never keeps it across cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    None,
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionState {
    pub side: PositionSide,
    /// Open size in base units; 0 when flat
    pub size: f64,
}

impl PositionState {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn long(size: f64) -> Self {
        Self {
            side: PositionSide::Long,
            size,
        }
    }

    pub fn short(size: f64) -> Self {
        Self {
            side: PositionSide::Short,
            size,
        }
    }

    pub fn is_open(&self) -> bool {
        self.side != PositionSide::None
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::None => write!(f, "none"),
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}
