//! Market data provider interface

use crate::error::CollaboratorError;
use crate::models::indicators::Candle;

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get up to `limit` recent candles for a symbol.
    ///
    /// May return fewer than requested. Callers must not assume any ordering
    /// and normalise to ascending time themselves.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CollaboratorError>;
}
