//! Position decision rules.
//!
//! The rules are an ordered table evaluated top to bottom; the first rule that
//! matches decides the cycle. Momentum exits sit above the signal rules so a
//! close always wins over an open in the same cycle.

use crate::models::intent::OrderAction;
use crate::models::position::{PositionSide, PositionState};
use crate::models::signal::{CrossEvent, Signal};

/// Everything a rule may look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionInput {
    pub position: PositionState,
    pub signal: Signal,
    pub cross: CrossEvent,
    pub momentum: f64,
    pub exit_level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    MomentumCloseLong,
    MomentumCloseShort,
    BuySignal,
    SellSignal,
    Hold,
}

impl DecisionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionRule::MomentumCloseLong => "momentum_close_long",
            DecisionRule::MomentumCloseShort => "momentum_close_short",
            DecisionRule::BuySignal => "buy_signal",
            DecisionRule::SellSignal => "sell_signal",
            DecisionRule::Hold => "hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub rule: DecisionRule,
    pub action: OrderAction,
    pub reason: String,
}

impl Decision {
    fn new(rule: DecisionRule, action: OrderAction, reason: impl Into<String>) -> Self {
        Self {
            rule,
            action,
            reason: reason.into(),
        }
    }
}

type RuleFn = fn(&DecisionInput) -> Option<Decision>;

/// Rule table in priority order
pub const RULES: [(DecisionRule, RuleFn); 5] = [
    (DecisionRule::MomentumCloseLong, momentum_close_long),
    (DecisionRule::MomentumCloseShort, momentum_close_short),
    (DecisionRule::BuySignal, buy_signal),
    (DecisionRule::SellSignal, sell_signal),
    (DecisionRule::Hold, hold),
];

/// Run the rule table and return the first matching decision
pub fn decide(input: &DecisionInput) -> Decision {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(input))
        .unwrap_or_else(|| Decision::new(DecisionRule::Hold, OrderAction::NoAction, "no trading signal"))
}

pub fn momentum_close_long(input: &DecisionInput) -> Option<Decision> {
    if input.position.side == PositionSide::Long && input.momentum < input.exit_level {
        return Some(Decision::new(
            DecisionRule::MomentumCloseLong,
            OrderAction::CloseLong,
            format!(
                "momentum reversal close: long position closed, momentum {:.2} crossed below {}",
                input.momentum, input.exit_level
            ),
        ));
    }
    None
}

pub fn momentum_close_short(input: &DecisionInput) -> Option<Decision> {
    if input.position.side == PositionSide::Short && input.momentum > input.exit_level {
        return Some(Decision::new(
            DecisionRule::MomentumCloseShort,
            OrderAction::CloseShort,
            format!(
                "momentum reversal close: short position closed, momentum {:.2} crossed above {}",
                input.momentum, input.exit_level
            ),
        ));
    }
    None
}

pub fn buy_signal(input: &DecisionInput) -> Option<Decision> {
    if input.signal != Signal::Buy {
        return None;
    }
    let rule = DecisionRule::BuySignal;
    let decision = match input.position.side {
        PositionSide::Short => Decision::new(
            rule,
            OrderAction::FlipToLong,
            "close short before opening long",
        ),
        PositionSide::Long => Decision::new(rule, OrderAction::NoAction, "already long"),
        PositionSide::None if input.cross == CrossEvent::Bullish => Decision::new(
            rule,
            OrderAction::OpenLong,
            "buy signal: price above cloud, fast line above slow line, momentum below overbought, golden cross confirmed",
        ),
        PositionSide::None => Decision::new(
            rule,
            OrderAction::NoAction,
            "buy signal without confirmed crossing",
        ),
    };
    Some(decision)
}

pub fn sell_signal(input: &DecisionInput) -> Option<Decision> {
    if input.signal != Signal::Sell {
        return None;
    }
    let rule = DecisionRule::SellSignal;
    let decision = match input.position.side {
        PositionSide::Long => Decision::new(
            rule,
            OrderAction::FlipToShort,
            "close long before opening short",
        ),
        PositionSide::Short => Decision::new(rule, OrderAction::NoAction, "already short"),
        PositionSide::None if input.cross == CrossEvent::Bearish => Decision::new(
            rule,
            OrderAction::OpenShort,
            "sell signal: price below cloud, fast line below slow line, momentum above oversold, death cross confirmed",
        ),
        PositionSide::None => Decision::new(
            rule,
            OrderAction::NoAction,
            "sell signal without confirmed crossing",
        ),
    };
    Some(decision)
}

pub fn hold(_input: &DecisionInput) -> Option<Decision> {
    Some(Decision::new(
        DecisionRule::Hold,
        OrderAction::NoAction,
        "no trading signal",
    ))
}
