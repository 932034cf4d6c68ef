//! Bybit v5 wire types.
//!
//! Every endpoint wraps its payload in the same envelope; numbers arrive as
//! strings and are parsed here rather than at the call sites.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::models::indicators::Candle;
use crate::models::position::PositionState;

pub const CATEGORY_LINEAR: &str = "linear";
pub const ACCOUNT_UNIFIED: &str = "UNIFIED";
pub const SETTLE_COIN: &str = "USDT";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    pub ret_code: i64,
    #[serde(default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ApiEnvelope {
    /// Unwrap the `result` object, turning a non-zero `retCode` into an error
    pub fn into_result<T: serde::de::DeserializeOwned>(self) -> Result<T, CollaboratorError> {
        if self.ret_code != 0 {
            return Err(CollaboratorError::Api {
                code: self.ret_code,
                message: self.ret_msg,
            });
        }
        serde_json::from_value(self.result).map_err(|e| CollaboratorError::Decode(e.to_string()))
    }
}

/// `list` rows are `[startTime, open, high, low, close, volume, turnover]`, newest first
#[derive(Debug, Deserialize)]
pub struct KlineResult {
    #[serde(default)]
    pub list: Vec<Vec<String>>,
}

impl KlineResult {
    /// Parse rows into candles sorted oldest first
    pub fn into_candles(self) -> Result<Vec<Candle>, CollaboratorError> {
        let mut candles = self
            .list
            .iter()
            .map(|row| parse_kline_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

fn parse_kline_row(row: &[String]) -> Result<Candle, CollaboratorError> {
    if row.len() < 6 {
        return Err(CollaboratorError::Decode(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }
    let start_ms: i64 = parse_field("startTime", &row[0])?;
    let timestamp = DateTime::from_timestamp_millis(start_ms)
        .ok_or_else(|| CollaboratorError::Decode(format!("invalid kline start time {}", start_ms)))?;
    Ok(Candle::new(
        parse_field("open", &row[1])?,
        parse_field("high", &row[2])?,
        parse_field("low", &row[3])?,
        parse_field("close", &row[4])?,
        parse_field("volume", &row[5])?,
        timestamp,
    ))
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, CollaboratorError> {
    raw.parse::<T>()
        .map_err(|_| CollaboratorError::Decode(format!("invalid {} value {:?}", name, raw)))
}

#[derive(Debug, Deserialize)]
pub struct PositionListResult {
    #[serde(default)]
    pub list: Vec<PositionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEntry {
    pub symbol: String,
    /// `Buy`, `Sell`, or empty for a flat one-way position
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub avg_price: String,
}

impl PositionListResult {
    /// First entry for `symbol` with a non-zero size, flat otherwise
    pub fn into_position(self, symbol: &str) -> Result<PositionState, CollaboratorError> {
        for entry in self.list.into_iter().filter(|p| p.symbol == symbol) {
            let size: f64 = if entry.size.is_empty() {
                0.0
            } else {
                parse_field("size", &entry.size)?
            };
            if size <= 0.0 {
                continue;
            }
            return match entry.side.as_str() {
                "Buy" => Ok(PositionState::long(size)),
                "Sell" => Ok(PositionState::short(size)),
                other => Err(CollaboratorError::Decode(format!(
                    "unknown position side {:?} for {}",
                    other, symbol
                ))),
            };
        }
        Ok(PositionState::flat())
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletBalanceResult {
    #[serde(default)]
    pub list: Vec<WalletAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub coin: Vec<WalletCoin>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCoin {
    pub coin: String,
    #[serde(default)]
    pub wallet_balance: String,
    #[serde(default)]
    pub available_to_withdraw: String,
}

impl WalletBalanceResult {
    /// Available balance of `coin`. Falls back to the wallet balance when the
    /// account does not report a withdrawable amount; 0 when the coin is absent.
    pub fn available(&self, coin: &str) -> Result<f64, CollaboratorError> {
        let Some(entry) = self
            .list
            .iter()
            .flat_map(|account| account.coin.iter())
            .find(|c| c.coin == coin)
        else {
            return Ok(0.0);
        };
        let raw = if entry.available_to_withdraw.trim().is_empty() {
            entry.wallet_balance.trim()
        } else {
            entry.available_to_withdraw.trim()
        };
        if raw.is_empty() {
            return Ok(0.0);
        }
        parse_field("balance", raw)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub category: &'static str,
    pub symbol: String,
    pub side: &'static str,
    pub order_type: &'static str,
    pub qty: String,
    pub time_in_force: &'static str,
    pub reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResult {
    pub order_id: String,
    #[serde(default)]
    pub order_link_id: String,
}
