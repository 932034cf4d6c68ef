//! External collaborators: market data, execution and the trade log sink.

pub mod bybit;
pub mod execution;
pub mod market_data;
pub mod notifier;

pub use bybit::BybitClient;
pub use execution::{ExecutionProvider, OrderAck, OrderRequest, OrderSide};
pub use market_data::MarketDataProvider;
pub use notifier::{Notifier, TradeLogger, TradeSink, WebhookNotifier, TRADE_LOG_TARGET};
