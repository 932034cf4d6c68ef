//! Configuration loaded from the environment.
//!
//! The engine itself only ever sees an immutable [`EngineConfig`]; the other
//! structs configure the collaborators and the polling loop.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

const BYBIT_MAINNET_URL: &str = "https://api.bybit.com";
const BYBIT_TESTNET_URL: &str = "https://api-testnet.bybit.com";

/// Deployment environment name (`APP_ENV`), defaults to `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|_| ConfigError::Parse {
                key: key.to_string(),
                value: raw,
            })
        }
        _ => Ok(default),
    }
}

fn env_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Parse {
                key: key.to_string(),
                value: raw,
            }),
        },
        Err(_) => Ok(default),
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parameters of the decision engine. Passed explicitly into every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub symbol: String,
    pub interval: String,
    pub fast_period: usize,
    pub slow_period: usize,
    pub cloud_b_period: usize,
    pub displacement: usize,
    pub momentum_period: usize,
    pub overbought: f64,
    pub oversold: f64,
    /// Momentum level an open position is closed against
    pub momentum_exit_level: f64,
    /// How many candles back the cross detector compares against
    pub cross_persistence: usize,
    /// Fraction of the available balance committed per new position
    pub risk_percent: f64,
    pub min_quantity: f64,
    pub quantity_precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: "15".to_string(),
            fast_period: 9,
            slow_period: 26,
            cloud_b_period: 52,
            displacement: 26,
            momentum_period: 14,
            overbought: 70.0,
            oversold: 30.0,
            momentum_exit_level: 50.0,
            cross_persistence: 4,
            risk_percent: 0.01,
            min_quantity: 0.001,
            quantity_precision: 3,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            symbol: env_opt("SYMBOL").unwrap_or(defaults.symbol),
            interval: env_opt("INTERVAL").unwrap_or(defaults.interval),
            overbought: env_or("RSI_OVERBOUGHT", defaults.overbought)?,
            oversold: env_or("RSI_OVERSOLD", defaults.oversold)?,
            risk_percent: env_or("RISK_PERCENT", defaults.risk_percent)?,
            cross_persistence: env_or("CROSS_PERSISTENCE", defaults.cross_persistence)?,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Candles needed before the cloud leads are defined at the last index
    pub fn warmup(&self) -> usize {
        self.slow_period.max(self.cloud_b_period) + self.displacement
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        let periods = [
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("cloud_b_period", self.cloud_b_period),
            ("momentum_period", self.momentum_period),
            ("cross_persistence", self.cross_persistence),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0", name)));
            }
        }
        for (name, value) in [
            ("overbought", self.overbought),
            ("oversold", self.oversold),
            ("momentum_exit_level", self.momentum_exit_level),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        if self.oversold >= self.overbought {
            return Err(ConfigError::Invalid(format!(
                "oversold ({}) must be below overbought ({})",
                self.oversold, self.overbought
            )));
        }
        if !(self.risk_percent > 0.0 && self.risk_percent <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "risk_percent must be within (0, 1], got {}",
                self.risk_percent
            )));
        }
        if self.min_quantity <= 0.0 {
            return Err(ConfigError::Invalid("min_quantity must be > 0".into()));
        }
        Ok(())
    }
}

/// Configuration for the polling loop
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub poll_interval_seconds: u64,
    pub candle_limit: usize,
    /// Drop the newest (still forming) candle before evaluating
    pub exclude_open_candle: bool,
    pub http_port: Option<u16>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 60,
            candle_limit: 200,
            exclude_open_candle: true,
            http_port: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let http_port = match env_opt("HTTP_PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| ConfigError::Parse {
                key: "HTTP_PORT".to_string(),
                value: raw,
            })?),
            None => None,
        };
        let config = Self {
            poll_interval_seconds: env_or("POLL_INTERVAL_SECONDS", defaults.poll_interval_seconds)?,
            candle_limit: env_or("CANDLE_LIMIT", defaults.candle_limit)?,
            exclude_open_candle: env_bool("EXCLUDE_OPEN_CANDLE", defaults.exclude_open_candle)?,
            http_port,
        };
        if config.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid("POLL_INTERVAL_SECONDS must be > 0".into()));
        }
        if config.candle_limit == 0 || config.candle_limit > 1000 {
            return Err(ConfigError::Invalid("CANDLE_LIMIT must be within 1..=1000".into()));
        }
        Ok(config)
    }
}

/// Exchange credentials and endpoint selection
#[derive(Clone, PartialEq)]
pub struct ExchangeConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub testnet: bool,
    pub recv_window_ms: u64,
    pub base_url: Option<String>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            testnet: true,
            recv_window_ms: 10_000,
            base_url: None,
        }
    }
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("testnet", &self.testnet)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ExchangeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_key: env_opt("API_KEY"),
            api_secret: env_opt("API_SECRET"),
            testnet: env_bool("TESTNET", defaults.testnet)?,
            recv_window_ms: env_or("RECV_WINDOW_MS", defaults.recv_window_ms)?,
            base_url: env_opt("EXCHANGE_BASE_URL"),
        })
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.testnet => BYBIT_TESTNET_URL.to_string(),
            None => BYBIT_MAINNET_URL.to_string(),
        }
    }
}

/// Trade notification settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifierConfig {
    pub webhook_url: Option<String>,
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        Self {
            webhook_url: env_opt("NOTIFY_WEBHOOK_URL"),
        }
    }

    pub fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}
