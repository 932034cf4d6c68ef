//! Linear position sizing: quantity = round(balance * risk / price, precision)

use thiserror::Error;

use crate::common::math;
use crate::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("available balance is zero")]
    ZeroBalance,

    #[error("reference price {0} is not usable")]
    InvalidPrice(f64),

    #[error("position size {quantity} is below the minimum {minimum}")]
    BelowMinimum { quantity: f64, minimum: f64 },
}

/// Size a new position from the available balance
pub fn position_size(
    balance: f64,
    reference_price: f64,
    config: &EngineConfig,
) -> Result<f64, SizingError> {
    if !(balance > 0.0) {
        return Err(SizingError::ZeroBalance);
    }
    if !(reference_price > 0.0) || !reference_price.is_finite() {
        return Err(SizingError::InvalidPrice(reference_price));
    }

    let quantity = math::round_to(
        balance * config.risk_percent / reference_price,
        config.quantity_precision,
    );
    if quantity < config.min_quantity {
        return Err(SizingError::BelowMinimum {
            quantity,
            minimum: config.min_quantity,
        });
    }
    Ok(quantity)
}
