//! Order intents and the decision records handed to the trade sink

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::position::{PositionSide, PositionState};
use super::signal::CrossEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
    FlipToLong,
    FlipToShort,
    NoAction,
}

impl OrderAction {
    pub const ALL: [OrderAction; 7] = [
        OrderAction::OpenLong,
        OrderAction::OpenShort,
        OrderAction::CloseLong,
        OrderAction::CloseShort,
        OrderAction::FlipToLong,
        OrderAction::FlipToShort,
        OrderAction::NoAction,
    ];

    /// Whether the execution layer has anything to do
    pub fn is_actionable(&self) -> bool {
        *self != OrderAction::NoAction
    }

    /// Actions that put new exposure on and therefore need a sized quantity.
    /// Closes reuse the size of the position being closed.
    pub fn requires_sizing(&self) -> bool {
        matches!(
            self,
            OrderAction::OpenLong
                | OrderAction::OpenShort
                | OrderAction::FlipToLong
                | OrderAction::FlipToShort
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::OpenLong => "open_long",
            OrderAction::OpenShort => "open_short",
            OrderAction::CloseLong => "close_long",
            OrderAction::CloseShort => "close_short",
            OrderAction::FlipToLong => "flip_to_long",
            OrderAction::FlipToShort => "flip_to_short",
            OrderAction::NoAction => "no_action",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State the decision was taken in, kept for audit logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub has_open_position: bool,
    pub position_side: PositionSide,
    /// Size of the open position at decision time, 0 when flat
    pub position_size: f64,
    pub cross_event: CrossEvent,
    pub momentum_value: Option<f64>,
}

impl DecisionContext {
    /// Context before any indicator has been evaluated
    pub fn for_position(position: &PositionState) -> Self {
        Self {
            has_open_position: position.is_open(),
            position_side: position.side,
            position_size: position.size,
            cross_event: CrossEvent::None,
            momentum_value: None,
        }
    }

    pub fn with_indicators(mut self, cross_event: CrossEvent, momentum_value: f64) -> Self {
        self.cross_event = cross_event;
        self.momentum_value = Some(momentum_value);
        self
    }
}

/// One decision per cycle. Built once by the engine and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub action: OrderAction,
    pub symbol: String,
    pub quantity: f64,
    pub reference_price: Option<f64>,
    pub reason: String,
    pub context: DecisionContext,
}

impl OrderIntent {
    pub fn no_action(
        symbol: impl Into<String>,
        reason: impl Into<String>,
        context: DecisionContext,
        reference_price: Option<f64>,
    ) -> Self {
        Self {
            action: OrderAction::NoAction,
            symbol: symbol.into(),
            quantity: 0.0,
            reference_price,
            reason: reason.into(),
            context,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.action.is_actionable()
    }
}

/// What the trade sink receives for every completed decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub action: OrderAction,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub quantity: f64,
    pub reason: String,
    pub context: DecisionContext,
    pub timestamp: DateTime<Utc>,
}

impl DecisionRecord {
    pub fn from_intent(intent: &OrderIntent, timestamp: DateTime<Utc>) -> Self {
        Self {
            action: intent.action,
            symbol: intent.symbol.clone(),
            price: intent.reference_price,
            quantity: intent.quantity,
            reason: intent.reason.clone(),
            context: intent.context,
            timestamp,
        }
    }
}
