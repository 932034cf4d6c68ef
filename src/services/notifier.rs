//! Trade log sink and outbound notifications

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

use crate::error::NotifyError;
use crate::models::intent::DecisionRecord;

/// Tracing target every decision record is written to
pub const TRADE_LOG_TARGET: &str = "trade_log";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Consumer of the decision records produced each cycle
#[async_trait::async_trait]
pub trait TradeSink: Send + Sync {
    async fn record(&self, record: &DecisionRecord) -> Result<(), NotifyError>;
}

/// Outbound channel for actionable decisions
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, record: &DecisionRecord) -> Result<(), NotifyError>;
}

/// POSTs each record as JSON to a webhook URL
#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    fn payload(record: &DecisionRecord) -> serde_json::Value {
        json!({
            "title": format!("{} {}", record.action, record.symbol),
            "text": record.reason,
            "record": record,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, record: &DecisionRecord) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(record))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Writes every record to the trade log and forwards actionable ones
#[derive(Clone, Default)]
pub struct TradeLogger {
    notifier: Option<Arc<dyn Notifier>>,
}

impl TradeLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }
}

#[async_trait::async_trait]
impl TradeSink for TradeLogger {
    async fn record(&self, record: &DecisionRecord) -> Result<(), NotifyError> {
        let context = serde_json::to_string(&record.context).unwrap_or_default();
        info!(
            target: "trade_log",
            action = %record.action,
            symbol = %record.symbol,
            price = record.price,
            quantity = record.quantity,
            reason = %record.reason,
            context = %context,
            timestamp = %record.timestamp.to_rfc3339(),
            "{} {}",
            record.action,
            record.symbol
        );

        if !record.action.is_actionable() {
            return Ok(());
        }
        let Some(notifier) = &self.notifier else {
            return Ok(());
        };
        notifier.notify(record).await.map_err(|e| {
            error!(
                action = %record.action,
                symbol = %record.symbol,
                error = %e,
                "Trade notification failed"
            );
            e
        })
    }
}
