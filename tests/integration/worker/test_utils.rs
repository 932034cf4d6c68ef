//! Mock collaborators for runtime tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use kumo::error::{CollaboratorError, NotifyError};
use kumo::models::indicators::Candle;
use kumo::models::intent::DecisionRecord;
use kumo::models::position::PositionState;
use kumo::services::execution::{ExecutionProvider, OrderAck, OrderRequest};
use kumo::services::market_data::MarketDataProvider;
use kumo::services::notifier::{Notifier, TradeSink};

fn rejected(what: &str) -> CollaboratorError {
    CollaboratorError::Rejected(format!("{} unavailable", what))
}

/// Exchange double serving canned market and account state
#[derive(Default)]
pub struct MockExchange {
    pub candles: Mutex<Vec<Candle>>,
    pub position: Mutex<PositionState>,
    pub balance: Mutex<f64>,
    pub orders: Mutex<Vec<OrderRequest>>,
    pub candle_calls: AtomicUsize,
    pub position_calls: AtomicUsize,
    pub fail_candles: bool,
    pub fail_balance: bool,
    pub fail_position: bool,
    pub fail_orders: bool,
}

impl MockExchange {
    pub fn new(candles: Vec<Candle>, position: PositionState, balance: f64) -> Self {
        Self {
            candles: Mutex::new(candles),
            position: Mutex::new(position),
            balance: Mutex::new(balance),
            ..Default::default()
        }
    }

    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for MockExchange {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CollaboratorError> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_candles {
            return Err(rejected("candles"));
        }
        let candles = self.candles.lock().unwrap();
        let skip = candles.len().saturating_sub(limit);
        Ok(candles[skip..].to_vec())
    }
}

#[async_trait::async_trait]
impl ExecutionProvider for MockExchange {
    async fn get_open_position(&self, _symbol: &str) -> Result<PositionState, CollaboratorError> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_position {
            return Err(rejected("position"));
        }
        Ok(*self.position.lock().unwrap())
    }

    async fn get_available_balance(&self) -> Result<f64, CollaboratorError> {
        if self.fail_balance {
            return Err(rejected("balance"));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, CollaboratorError> {
        if self.fail_orders {
            return Err(CollaboratorError::Api {
                code: 110007,
                message: "insufficient margin".to_string(),
            });
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(OrderAck {
            order_id: format!("order-{}", orders.len()),
        })
    }
}

/// Sink that keeps every record it receives
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<DecisionRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TradeSink for RecordingSink {
    async fn record(&self, record: &DecisionRecord) -> Result<(), NotifyError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Notifier that always fails, counting attempts
#[derive(Default)]
pub struct FailingNotifier {
    pub attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _record: &DecisionRecord) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Status(500))
    }
}
