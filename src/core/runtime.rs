//! Polling runtime that drives one decision cycle per interval

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{EngineConfig, RuntimeConfig};
use crate::core::http::HealthStatus;
use crate::error::CycleError;
use crate::metrics::Metrics;
use crate::models::indicators::normalize_ascending;
use crate::models::intent::{DecisionRecord, OrderIntent};
use crate::services::execution::{ExecutionProvider, OrderRequest};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::TradeSink;
use crate::signals::engine::evaluate_cycle;

pub struct TradingRuntime {
    engine: EngineConfig,
    config: RuntimeConfig,
    market_data: Arc<dyn MarketDataProvider>,
    execution: Arc<dyn ExecutionProvider>,
    sink: Arc<dyn TradeSink>,
    metrics: Option<Arc<Metrics>>,
    health: Option<Arc<RwLock<HealthStatus>>>,
}

impl TradingRuntime {
    pub fn new(
        engine: EngineConfig,
        config: RuntimeConfig,
        market_data: Arc<dyn MarketDataProvider>,
        execution: Arc<dyn ExecutionProvider>,
        sink: Arc<dyn TradeSink>,
    ) -> Self {
        Self {
            engine,
            config,
            market_data,
            execution,
            sink,
            metrics: None,
            health: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_health(mut self, health: Arc<RwLock<HealthStatus>>) -> Self {
        self.health = Some(health);
        self
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Run cycles until `shutdown` is cancelled. A failed cycle is logged and
    /// the loop carries on with the next interval.
    pub async fn run(&self, shutdown: CancellationToken) {
        let interval = Duration::from_secs(self.config.poll_interval_seconds);
        info!(
            symbol = %self.engine.symbol,
            interval = %self.engine.interval,
            poll_seconds = self.config.poll_interval_seconds,
            "Trading runtime started for {}",
            self.engine.symbol
        );

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            // Errors are already logged and counted inside run_cycle
            let _ = self.run_cycle().await;

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!(symbol = %self.engine.symbol, "Trading runtime stopped");
    }

    /// One full cycle: read account and market state, decide, execute, record
    pub async fn run_cycle(&self) -> Result<OrderIntent, CycleError> {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.cycles_total.inc();
        }

        let result = self.execute_cycle().await;

        if let Some(metrics) = &self.metrics {
            metrics
                .cycle_duration_seconds
                .observe(started.elapsed().as_secs_f64());
            match &result {
                Ok(intent) => metrics.record_decision(intent.action),
                Err(e) => metrics.record_failure(e.step()),
            }
        }
        if let Err(e) = &result {
            error!(
                symbol = %self.engine.symbol,
                step = e.step(),
                error = %e,
                "Cycle aborted: {}",
                e
            );
        }
        if let Some(health) = &self.health {
            health.write().await.record_cycle(&result);
        }
        result
    }

    async fn execute_cycle(&self) -> Result<OrderIntent, CycleError> {
        let symbol = &self.engine.symbol;

        let balance = self
            .execution
            .get_available_balance()
            .await
            .map_err(CycleError::Balance)?;

        let mut candles = normalize_ascending(
            self.market_data
                .fetch_candles(symbol, &self.engine.interval, self.config.candle_limit)
                .await
                .map_err(CycleError::Candles)?,
        );
        if self.config.exclude_open_candle {
            candles.pop();
        }

        let position = self
            .execution
            .get_open_position(symbol)
            .await
            .map_err(CycleError::Position)?;

        let intent = evaluate_cycle(&candles, &position, balance, &self.engine);
        info!(
            symbol = %symbol,
            action = %intent.action,
            quantity = intent.quantity,
            balance = balance,
            candles = candles.len(),
            position = %position.side,
            "Decision: {} ({})",
            intent.action,
            intent.reason
        );

        if let Some(order) = OrderRequest::from_intent(&intent) {
            let ack = self
                .execution
                .place_order(&order)
                .await
                .map_err(CycleError::Order)?;
            info!(
                symbol = %symbol,
                side = order.side.as_str(),
                quantity = order.quantity,
                reduce_only = order.reduce_only,
                order_id = %ack.order_id,
                "Order placed for {}",
                intent.action
            );
            if let Some(metrics) = &self.metrics {
                metrics.orders_placed_total.inc();
            }
        }

        let record = DecisionRecord::from_intent(&intent, Utc::now());
        if let Err(e) = self.sink.record(&record).await {
            warn!(symbol = %symbol, error = %e, "Trade record not delivered");
            if let Some(metrics) = &self.metrics {
                metrics.notification_failures_total.inc();
            }
        }

        Ok(intent)
    }
}
