//! Kumo Worker
//!
//! Polls the exchange once per interval, evaluates the cycle and places the
//! resulting order. Optionally serves /health and /metrics.

use anyhow::Context;
use dotenvy::dotenv;
use kumo::config::{EngineConfig, ExchangeConfig, NotifierConfig, RuntimeConfig};
use kumo::core::http::{start_server, AppState, HealthStatus};
use kumo::core::runtime::TradingRuntime;
use kumo::logging;
use kumo::metrics::Metrics;
use kumo::services::bybit::BybitClient;
use kumo::services::notifier::{TradeLogger, WebhookNotifier};
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = kumo::config::get_environment();
    info!(environment = %env, "Starting Kumo worker");

    let engine = EngineConfig::from_env().context("invalid engine configuration")?;
    let runtime_config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let exchange = ExchangeConfig::from_env().context("invalid exchange configuration")?;
    let notifier_config = NotifierConfig::from_env();
    info!(
        symbol = %engine.symbol,
        interval = %engine.interval,
        risk_percent = engine.risk_percent,
        testnet = exchange.testnet,
        "Configuration loaded"
    );
    if exchange.api_key.is_none() || exchange.api_secret.is_none() {
        warn!("API_KEY/API_SECRET not set; account and order calls will fail every cycle");
    }

    let client = Arc::new(BybitClient::new(&exchange).context("failed to build exchange client")?);

    let sink = match &notifier_config.webhook_url {
        Some(url) => {
            info!("Trade notifications enabled");
            let notifier = WebhookNotifier::new(url.clone())
                .context("failed to build webhook notifier")?;
            TradeLogger::with_notifier(Arc::new(notifier))
        }
        None => TradeLogger::new(),
    };

    let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
    let health = Arc::new(RwLock::new(HealthStatus::default()));

    if let Some(port) = runtime_config.http_port {
        let state = AppState {
            health: health.clone(),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
        };
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "HTTP server stopped");
            }
        });
    }

    let runtime = TradingRuntime::new(
        engine,
        runtime_config,
        client.clone(),
        client,
        Arc::new(sink),
    )
    .with_metrics(metrics)
    .with_health(health);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    runtime.run(shutdown).await;
    info!("Worker shutdown complete");
    Ok(())
}
