//! Decision cycle evaluation: candles + position + balance -> one order intent.
//!
//! Pure with respect to its inputs. Nothing is retained between calls and the
//! position snapshot is whatever the caller read for this cycle.

use std::borrow::Cow;

use tracing::debug;

use crate::config::EngineConfig;
use crate::indicators::compute_indicators;
use crate::models::indicators::{Candle, IndicatorSnapshot};
use crate::models::intent::{DecisionContext, OrderIntent};
use crate::models::position::PositionState;
use crate::models::signal::{CrossEvent, Signal};
use crate::signals::classifier::{ClassifierInput, SignalClassifier};
use crate::signals::cross::CrossDetector;
use crate::signals::decision::{decide, DecisionInput, DecisionRule};
use crate::signals::sizing::position_size;

/// Warmup with the default periods: 52-candle cloud window + 26 displacement
pub const MIN_CANDLES: usize = 78;

pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Full result of a cycle, for callers that want more than the intent
#[derive(Debug, Clone, PartialEq)]
pub struct CycleEvaluation {
    pub intent: OrderIntent,
    pub signal: Option<Signal>,
    pub cross: CrossEvent,
    pub rule: Option<DecisionRule>,
    pub snapshot: Option<IndicatorSnapshot>,
}

/// Evaluate one decision cycle and return its order intent
pub fn evaluate_cycle(
    candles: &[Candle],
    position: &PositionState,
    balance: f64,
    config: &EngineConfig,
) -> OrderIntent {
    SignalEngine::evaluate(candles, position, balance, config).intent
}

pub struct SignalEngine;

impl SignalEngine {
    pub fn evaluate(
        candles: &[Candle],
        position: &PositionState,
        balance: f64,
        config: &EngineConfig,
    ) -> CycleEvaluation {
        let candles = ascending(candles);
        let base_context = DecisionContext::for_position(position);
        let reference_price = candles.last().map(|c| c.close);

        let insufficient = |snapshot: Option<IndicatorSnapshot>| CycleEvaluation {
            intent: OrderIntent::no_action(
                config.symbol.clone(),
                INSUFFICIENT_DATA,
                base_context,
                reference_price,
            ),
            signal: None,
            cross: CrossEvent::None,
            rule: None,
            snapshot,
        };

        if candles.len() < config.warmup() {
            debug!(
                symbol = %config.symbol,
                count = candles.len(),
                required = config.warmup(),
                "not enough candles ({} < {}) for {}",
                candles.len(),
                config.warmup(),
                config.symbol
            );
            return insufficient(None);
        }

        let series = compute_indicators(&candles, config);
        let snapshot = match series.latest() {
            Some(s) if s.is_complete() => s,
            other => return insufficient(other),
        };
        let (
            Some(close),
            Some(fast_line),
            Some(slow_line),
            Some(cloud_lead_a),
            Some(cloud_lead_b),
            Some(momentum),
        ) = (
            reference_price,
            snapshot.fast_line,
            snapshot.slow_line,
            snapshot.cloud_lead_a,
            snapshot.cloud_lead_b,
            snapshot.momentum,
        )
        else {
            return insufficient(Some(snapshot));
        };

        let cross = CrossDetector::new(config.cross_persistence)
            .detect(&series.fast_line, &series.slow_line);
        let signal = SignalClassifier::from(config).classify(&ClassifierInput {
            close,
            cloud_lead_a,
            cloud_lead_b,
            fast_line,
            slow_line,
            momentum,
        });
        let decision = decide(&DecisionInput {
            position: *position,
            signal,
            cross,
            momentum,
            exit_level: config.momentum_exit_level,
        });
        let context = base_context.with_indicators(cross, momentum);

        debug!(
            symbol = %config.symbol,
            signal = %signal,
            cross = %cross,
            momentum = momentum,
            rule = decision.rule.as_str(),
            action = %decision.action,
            "cycle decision for {}: {} ({})",
            config.symbol,
            decision.action,
            decision.reason
        );

        let quantity = if decision.action.requires_sizing() {
            match position_size(balance, close, config) {
                Ok(quantity) => quantity,
                Err(e) => {
                    let reason = format!("cannot size position: {}", e);
                    return CycleEvaluation {
                        intent: OrderIntent::no_action(
                            config.symbol.clone(),
                            reason,
                            context,
                            Some(close),
                        ),
                        signal: Some(signal),
                        cross,
                        rule: Some(decision.rule),
                        snapshot: Some(snapshot),
                    };
                }
            }
        } else if decision.action.is_actionable() {
            position.size
        } else {
            0.0
        };

        CycleEvaluation {
            intent: OrderIntent {
                action: decision.action,
                symbol: config.symbol.clone(),
                quantity,
                reference_price: Some(close),
                reason: decision.reason,
                context,
            },
            signal: Some(signal),
            cross,
            rule: Some(decision.rule),
            snapshot: Some(snapshot),
        }
    }
}

fn ascending(candles: &[Candle]) -> Cow<'_, [Candle]> {
    if candles.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        Cow::Borrowed(candles)
    } else {
        let mut sorted = candles.to_vec();
        sorted.sort_by_key(|c| c.timestamp);
        Cow::Owned(sorted)
    }
}
