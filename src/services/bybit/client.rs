//! Bybit v5 REST client.
//!
//! Public market data is unsigned. Account and order endpoints are signed with
//! HMAC-SHA256 over `timestamp + api_key + recv_window + payload`, where the
//! payload is the query string for GET and the JSON body for POST.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, info, warn};

use super::messages::{
    ApiEnvelope, CreateOrderRequest, CreateOrderResult, KlineResult, PositionListResult,
    WalletBalanceResult, ACCOUNT_UNIFIED, CATEGORY_LINEAR, SETTLE_COIN,
};
use crate::config::ExchangeConfig;
use crate::error::CollaboratorError;
use crate::models::indicators::Candle;
use crate::models::position::PositionState;
use crate::services::execution::{ExecutionProvider, OrderAck, OrderRequest};
use crate::services::market_data::MarketDataProvider;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: usize = 3;
const MAX_KLINE_LIMIT: usize = 1000;

#[derive(Clone)]
struct Credentials {
    api_key: String,
    api_secret: String,
}

#[derive(Clone)]
pub struct BybitClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
    recv_window_ms: u64,
}

impl BybitClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self, CollaboratorError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut client = Self::with_client(config.base_url(), http);
        client.recv_window_ms = config.recv_window_ms;
        if let (Some(key), Some(secret)) = (&config.api_key, &config.api_secret) {
            client = client.with_credentials(key, secret);
        }
        info!(
            base_url = %client.base_url,
            testnet = config.testnet,
            authenticated = client.credentials.is_some(),
            "Bybit client configured"
        );
        Ok(client)
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            recv_window_ms: 10_000,
        }
    }

    pub fn with_credentials(mut self, api_key: &str, api_secret: &str) -> Self {
        self.credentials = Some(Credentials {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        });
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials(&self) -> Result<&Credentials, CollaboratorError> {
        self.credentials
            .as_ref()
            .ok_or(CollaboratorError::MissingCredentials)
    }

    /// Hex HMAC-SHA256 signature for a private request
    pub fn sign(
        api_secret: &str,
        timestamp: i64,
        api_key: &str,
        recv_window_ms: u64,
        payload: &str,
    ) -> Result<String, CollaboratorError> {
        let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
            .map_err(|e| CollaboratorError::Rejected(format!("invalid API secret: {}", e)))?;
        mac.update(format!("{}{}{}{}", timestamp, api_key, recv_window_ms, payload).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn auth_headers(&self, payload: &str) -> Result<Vec<(&'static str, String)>, CollaboratorError> {
        let creds = self.credentials()?;
        let timestamp = Utc::now().timestamp_millis();
        let signature = Self::sign(
            &creds.api_secret,
            timestamp,
            &creds.api_key,
            self.recv_window_ms,
            payload,
        )?;
        Ok(vec![
            ("X-BAPI-API-KEY", creds.api_key.clone()),
            ("X-BAPI-TIMESTAMP", timestamp.to_string()),
            ("X-BAPI-SIGN", signature),
            ("X-BAPI-RECV-WINDOW", self.recv_window_ms.to_string()),
        ])
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        signed: bool,
    ) -> Result<T, CollaboratorError> {
        let url = format!("{}{}?{}", self.base_url, path, query);
        let url = url.as_str();
        let send = move || async move {
            let mut request = self.http.get(url);
            if signed {
                for (name, value) in self.auth_headers(query)? {
                    request = request.header(name, value);
                }
            }
            let envelope: ApiEnvelope = request.send().await?.error_for_status()?.json().await?;
            Ok::<_, CollaboratorError>(envelope)
        };

        let envelope = send
            .retry(backoff())
            .when(is_transient)
            .notify(|err: &CollaboratorError, after: Duration| {
                warn!(path = path, error = %err, retry_in_ms = after.as_millis() as u64, "Retrying Bybit request");
            })
            .await?;
        envelope.into_result()
    }

    /// Orders are never retried: a timeout does not tell us whether it was placed
    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CollaboratorError> {
        let payload =
            serde_json::to_string(body).map_err(|e| CollaboratorError::Decode(e.to_string()))?;
        let mut request = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json");
        for (name, value) in self.auth_headers(&payload)? {
            request = request.header(name, value);
        }
        let envelope: ApiEnvelope = request
            .body(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_result()
    }

    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CollaboratorError> {
        let limit = limit.clamp(1, MAX_KLINE_LIMIT);
        let query = format!(
            "category={}&symbol={}&interval={}&limit={}",
            CATEGORY_LINEAR, symbol, interval, limit
        );
        let result: KlineResult = self.get("/v5/market/kline", &query, false).await?;
        let candles = result.into_candles()?;
        debug!(symbol = symbol, interval = interval, count = candles.len(), "Fetched klines");
        Ok(candles)
    }

    pub async fn get_position(&self, symbol: &str) -> Result<PositionState, CollaboratorError> {
        let query = format!("category={}&symbol={}", CATEGORY_LINEAR, symbol);
        let result: PositionListResult = self.get("/v5/position/list", &query, true).await?;
        result.into_position(symbol)
    }

    pub async fn get_wallet_balance(&self) -> Result<f64, CollaboratorError> {
        let query = format!("accountType={}&coin={}", ACCOUNT_UNIFIED, SETTLE_COIN);
        let result: WalletBalanceResult =
            self.get("/v5/account/wallet-balance", &query, true).await?;
        result.available(SETTLE_COIN)
    }

    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderAck, CollaboratorError> {
        let body = CreateOrderRequest {
            category: CATEGORY_LINEAR,
            symbol: order.symbol.clone(),
            side: order.side.as_str(),
            order_type: "Market",
            qty: format_decimal(order.quantity),
            time_in_force: "GTC",
            reduce_only: order.reduce_only,
            take_profit: order.take_profit.map(format_decimal),
            stop_loss: order.stop_loss.map(format_decimal),
        };
        let result: CreateOrderResult = self.post("/v5/order/create", &body).await?;
        info!(
            symbol = %order.symbol,
            side = order.side.as_str(),
            qty = %body.qty,
            reduce_only = order.reduce_only,
            order_id = %result.order_id,
            "Order accepted"
        );
        Ok(OrderAck {
            order_id: result.order_id,
        })
    }
}

fn backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(200))
        .with_max_delay(Duration::from_secs(2))
        .with_max_times(MAX_RETRIES)
}

fn is_transient(err: &CollaboratorError) -> bool {
    match err {
        CollaboratorError::Http(e) => e.is_connect() || e.is_timeout(),
        _ => false,
    }
}

/// Decimal string without float noise or trailing zeros
pub fn format_decimal(value: f64) -> String {
    let s = format!("{:.8}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for BybitClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CollaboratorError> {
        self.get_klines(symbol, interval, limit).await
    }
}

#[async_trait::async_trait]
impl ExecutionProvider for BybitClient {
    async fn get_open_position(&self, symbol: &str) -> Result<PositionState, CollaboratorError> {
        self.get_position(symbol).await
    }

    async fn get_available_balance(&self) -> Result<f64, CollaboratorError> {
        self.get_wallet_balance().await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, CollaboratorError> {
        self.create_order(order).await
    }
}
