//! Integration tests for the polling runtime
//!
//! Drives full cycles against mocked exchange and sink collaborators.

#[path = "worker/test_utils.rs"]
mod test_utils;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use kumo::config::{EngineConfig, RuntimeConfig};
use kumo::core::http::HealthStatus;
use kumo::core::runtime::TradingRuntime;
use kumo::error::CycleError;
use kumo::metrics::Metrics;
use kumo::models::intent::OrderAction;
use kumo::models::position::PositionState;
use kumo::services::execution::OrderSide;
use kumo::services::notifier::{TradeLogger, TradeSink};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::candles::{breakdown_candles, breakout_candles, ranging_candles, with_forming_candle};
use test_utils::{FailingNotifier, MockExchange, RecordingSink};

fn runtime(exchange: Arc<MockExchange>, sink: Arc<dyn TradeSink>) -> TradingRuntime {
    TradingRuntime::new(
        EngineConfig::default(),
        RuntimeConfig::default(),
        exchange.clone(),
        exchange,
        sink,
    )
}

#[tokio::test]
async fn cycle_opens_long_and_records_decision() {
    let exchange = Arc::new(MockExchange::new(
        with_forming_candle(breakout_candles(), 90.0),
        PositionState::flat(),
        1_000_000.0,
    ));
    let sink = Arc::new(RecordingSink::default());

    let intent = runtime(exchange.clone(), sink.clone()).run_cycle().await.unwrap();

    assert_eq!(intent.action, OrderAction::OpenLong);
    // The forming candle (90) is ignored; sizing uses the last closed candle
    assert_eq!(intent.reference_price, Some(105.0));
    assert_eq!(intent.quantity, 95.238);

    let orders = exchange.placed_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::Buy);
    assert_eq!(orders[0].quantity, 95.238);
    assert!(!orders[0].reduce_only);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, OrderAction::OpenLong);
    assert_eq!(records[0].price, Some(105.0));
}

#[tokio::test]
async fn forming_candle_is_kept_when_configured() {
    let exchange = Arc::new(MockExchange::new(
        breakout_candles(),
        PositionState::flat(),
        1_000_000.0,
    ));
    let sink = Arc::new(RecordingSink::default());
    let config = RuntimeConfig {
        exclude_open_candle: false,
        ..RuntimeConfig::default()
    };
    let runtime = TradingRuntime::new(
        EngineConfig::default(),
        config,
        exchange.clone(),
        exchange.clone(),
        sink,
    );

    let intent = runtime.run_cycle().await.unwrap();
    assert_eq!(intent.action, OrderAction::OpenLong);
    assert_eq!(intent.reference_price, Some(105.0));
}

#[tokio::test]
async fn cycle_closes_long_with_reduce_only_order() {
    let exchange = Arc::new(MockExchange::new(
        with_forming_candle(breakdown_candles(), 95.0),
        PositionState::long(0.25),
        1_000_000.0,
    ));
    let sink = Arc::new(RecordingSink::default());

    let intent = runtime(exchange.clone(), sink).run_cycle().await.unwrap();

    assert_eq!(intent.action, OrderAction::CloseLong);
    let orders = exchange.placed_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::Sell);
    assert_eq!(orders[0].quantity, 0.25);
    assert!(orders[0].reduce_only);
}

#[tokio::test]
async fn insufficient_history_places_nothing_but_still_records() {
    let exchange = Arc::new(MockExchange::new(
        ranging_candles(40),
        PositionState::flat(),
        1_000_000.0,
    ));
    let sink = Arc::new(RecordingSink::default());

    let intent = runtime(exchange.clone(), sink.clone()).run_cycle().await.unwrap();

    assert_eq!(intent.action, OrderAction::NoAction);
    assert_eq!(intent.reason, "insufficient data");
    assert!(exchange.placed_orders().is_empty());
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn empty_candle_fetch_is_insufficient_data() {
    let exchange = Arc::new(MockExchange::new(Vec::new(), PositionState::flat(), 1000.0));
    let sink = Arc::new(RecordingSink::default());

    let intent = runtime(exchange, sink).run_cycle().await.unwrap();
    assert_eq!(intent.action, OrderAction::NoAction);
    assert_eq!(intent.reason, "insufficient data");
}

#[tokio::test]
async fn balance_failure_aborts_cycle() {
    let exchange = Arc::new(MockExchange {
        fail_balance: true,
        ..MockExchange::new(breakout_candles(), PositionState::flat(), 1_000_000.0)
    });
    let sink = Arc::new(RecordingSink::default());
    let metrics = Arc::new(Metrics::new().unwrap());

    let err = runtime(exchange.clone(), sink.clone())
        .with_metrics(metrics.clone())
        .run_cycle()
        .await
        .unwrap_err();

    assert!(matches!(err, CycleError::Balance(_)));
    assert_eq!(exchange.candle_calls.load(Ordering::SeqCst), 0);
    assert!(sink.records().is_empty());
    assert_eq!(
        metrics
            .cycle_failures_total
            .with_label_values(&["balance"])
            .get(),
        1
    );
}

#[tokio::test]
async fn candle_failure_aborts_before_position_read() {
    let exchange = Arc::new(MockExchange {
        fail_candles: true,
        ..MockExchange::new(Vec::new(), PositionState::flat(), 1000.0)
    });
    let sink = Arc::new(RecordingSink::default());

    let err = runtime(exchange.clone(), sink).run_cycle().await.unwrap_err();
    assert!(matches!(err, CycleError::Candles(_)));
    assert_eq!(err.step(), "candles");
    assert_eq!(exchange.position_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn position_failure_aborts_cycle() {
    let exchange = Arc::new(MockExchange {
        fail_position: true,
        ..MockExchange::new(breakout_candles(), PositionState::flat(), 1000.0)
    });
    let sink = Arc::new(RecordingSink::default());

    let err = runtime(exchange, sink.clone()).run_cycle().await.unwrap_err();
    assert!(matches!(err, CycleError::Position(_)));
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn order_failure_aborts_before_recording() {
    let exchange = Arc::new(MockExchange {
        fail_orders: true,
        ..MockExchange::new(
            with_forming_candle(breakout_candles(), 105.0),
            PositionState::flat(),
            1_000_000.0,
        )
    });
    let sink = Arc::new(RecordingSink::default());

    let err = runtime(exchange, sink.clone()).run_cycle().await.unwrap_err();
    assert!(matches!(
        err,
        CycleError::Order(kumo::error::CollaboratorError::Api { code: 110007, .. })
    ));
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_fail_cycle() {
    let exchange = Arc::new(MockExchange::new(
        with_forming_candle(breakout_candles(), 105.0),
        PositionState::flat(),
        1_000_000.0,
    ));
    let notifier = Arc::new(FailingNotifier::default());
    let sink = Arc::new(TradeLogger::with_notifier(notifier.clone()));
    let metrics = Arc::new(Metrics::new().unwrap());

    let intent = runtime(exchange.clone(), sink)
        .with_metrics(metrics.clone())
        .run_cycle()
        .await
        .unwrap();

    assert_eq!(intent.action, OrderAction::OpenLong);
    assert_eq!(exchange.placed_orders().len(), 1);
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(metrics.notification_failures_total.get(), 1);
    assert_eq!(
        metrics
            .decisions_total
            .with_label_values(&["open_long"])
            .get(),
        1
    );
}

#[tokio::test]
async fn position_is_reread_every_cycle() {
    let exchange = Arc::new(MockExchange::new(
        with_forming_candle(breakout_candles(), 105.0),
        PositionState::flat(),
        1_000_000.0,
    ));
    let sink = Arc::new(RecordingSink::default());
    let runtime = runtime(exchange.clone(), sink);

    let first = runtime.run_cycle().await.unwrap();
    assert_eq!(first.action, OrderAction::OpenLong);

    *exchange.position.lock().unwrap() = PositionState::long(95.238);
    let second = runtime.run_cycle().await.unwrap();
    assert_eq!(second.action, OrderAction::NoAction);
    assert_eq!(second.reason, "already long");
    assert_eq!(exchange.position_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn health_degrades_after_repeated_failures() {
    let exchange = Arc::new(MockExchange {
        fail_balance: true,
        ..MockExchange::default()
    });
    let sink = Arc::new(RecordingSink::default());
    let health = Arc::new(RwLock::new(HealthStatus::default()));
    let runtime = runtime(exchange, sink).with_health(health.clone());

    for _ in 0..3 {
        assert!(runtime.run_cycle().await.is_err());
    }

    let status = health.read().await;
    assert_eq!(status.status, "degraded");
    assert_eq!(status.consecutive_failures, 3);
    assert!(status.last_error.as_deref().unwrap_or("").contains("balance"));
}

#[tokio::test]
async fn run_stops_on_cancellation() {
    let exchange = Arc::new(MockExchange::new(
        ranging_candles(100),
        PositionState::flat(),
        1000.0,
    ));
    let sink = Arc::new(RecordingSink::default());
    let runtime = Arc::new(runtime(exchange.clone(), sink.clone()));
    let shutdown = CancellationToken::new();

    let handle = {
        let runtime = runtime.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { runtime.run(shutdown).await })
    };

    // First cycle runs immediately, then the loop waits for the 60s interval
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("runtime did not stop")
        .unwrap();
    assert_eq!(exchange.candle_calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn cancelled_before_start_runs_no_cycle() {
    let exchange = Arc::new(MockExchange::new(
        ranging_candles(100),
        PositionState::flat(),
        1000.0,
    ));
    let sink = Arc::new(RecordingSink::default());
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    runtime(exchange.clone(), sink).run(shutdown).await;
    assert_eq!(exchange.candle_calls.load(Ordering::SeqCst), 0);
}
