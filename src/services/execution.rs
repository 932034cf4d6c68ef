//! Execution and account interface, plus the intent -> order translation

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::models::intent::{OrderAction, OrderIntent};
use crate::models::position::PositionState;

#[async_trait::async_trait]
pub trait ExecutionProvider: Send + Sync {
    /// Current position for the symbol; flat when nothing with size > 0 is open
    async fn get_open_position(&self, symbol: &str) -> Result<PositionState, CollaboratorError>;

    /// Balance available for new positions, in quote currency
    async fn get_available_balance(&self) -> Result<f64, CollaboratorError>;

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, CollaboratorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        }
    }
}

/// Market order handed to the execution venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
}

impl OrderRequest {
    /// Translate an intent into a single market order.
    ///
    /// Closes are reduce-only for the open size. Flips trade the open size
    /// plus the newly sized quantity in one order so the venue nets the old
    /// position out. Returns `None` when there is nothing to send.
    pub fn from_intent(intent: &OrderIntent) -> Option<Self> {
        let open_size = intent.context.position_size;
        let (side, quantity, reduce_only) = match intent.action {
            OrderAction::OpenLong => (OrderSide::Buy, intent.quantity, false),
            OrderAction::OpenShort => (OrderSide::Sell, intent.quantity, false),
            OrderAction::CloseLong => (OrderSide::Sell, intent.quantity, true),
            OrderAction::CloseShort => (OrderSide::Buy, intent.quantity, true),
            OrderAction::FlipToLong => (OrderSide::Buy, open_size + intent.quantity, false),
            OrderAction::FlipToShort => (OrderSide::Sell, open_size + intent.quantity, false),
            OrderAction::NoAction => return None,
        };
        if !(quantity > 0.0) {
            return None;
        }
        Some(Self {
            symbol: intent.symbol.clone(),
            side,
            quantity,
            reduce_only,
            take_profit: None,
            stop_loss: None,
        })
    }

    pub fn with_take_profit(mut self, price: f64) -> Self {
        self.take_profit = Some(price);
        self
    }

    pub fn with_stop_loss(mut self, price: f64) -> Self {
        self.stop_loss = Some(price);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
}
