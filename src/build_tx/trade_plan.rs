use crate::build_tx::pump_fun::{quote_buy, CurveSnapshot};
use crate::constants::pump_fun::BASIS_POINTS_DENOMINATOR;
use crate::errors::{BotError, BotResult};

/// What the caller wants out of one round trip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TradeIntent {
    base_amount_in: u64,
    slippage_basis_points: u32,
    priority_fee_rate: f64,
}

impl TradeIntent {
    pub fn new(
        base_amount_in: u64,
        slippage_basis_points: u32,
        priority_fee_rate: f64,
    ) -> BotResult<Self> {
        if base_amount_in == 0 {
            return Err(BotError::InvalidTradeIntent(
                "buy amount must be greater than zero".to_string(),
            ));
        }
        if slippage_basis_points as u128 > BASIS_POINTS_DENOMINATOR {
            return Err(BotError::InvalidTradeIntent(format!(
                "slippage {} bps above 10000",
                slippage_basis_points
            )));
        }
        if !priority_fee_rate.is_finite() || priority_fee_rate < 0.0 {
            return Err(BotError::InvalidTradeIntent(format!(
                "priority fee {} must be a non-negative number",
                priority_fee_rate
            )));
        }
        Ok(TradeIntent {
            base_amount_in,
            slippage_basis_points,
            priority_fee_rate,
        })
    }

    pub fn base_amount_in(&self) -> u64 {
        self.base_amount_in
    }

    pub fn slippage_basis_points(&self) -> u32 {
        self.slippage_basis_points
    }

    pub fn priority_fee_rate(&self) -> f64 {
        self.priority_fee_rate
    }
}

/// Token amount to acquire and the most SOL the buy may spend on it.
///
/// The sell leg has no counterpart here: it always sells exactly
/// `token_amount_out` with a zero SOL floor. Both legs land in one atomic
/// transaction, so the exit is not slippage protected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedTradePlan {
    pub token_amount_out: u128,
    pub max_base_cost: u64,
}

/// `max_base_cost = base_amount_in * (10000 + slippage) / 10000`, multiply first.
pub fn plan_trade(
    token_amount_out: u128,
    slippage_basis_points: u32,
    base_amount_in: u64,
) -> BotResult<BoundedTradePlan> {
    let multiplier = BASIS_POINTS_DENOMINATOR + slippage_basis_points as u128;
    let max_base_cost = (base_amount_in as u128)
        .checked_mul(multiplier)
        .ok_or(BotError::ArithmeticOverflow("max sol cost"))?
        / BASIS_POINTS_DENOMINATOR;
    let max_base_cost =
        u64::try_from(max_base_cost).map_err(|_| BotError::ArithmeticOverflow("max sol cost"))?;

    Ok(BoundedTradePlan {
        token_amount_out,
        max_base_cost,
    })
}

/// Prices the intent against the snapshot and bounds its cost.
pub fn plan_from_snapshot(
    snapshot: &CurveSnapshot,
    intent: &TradeIntent,
) -> BotResult<BoundedTradePlan> {
    let quote = quote_buy(snapshot, intent.base_amount_in)?;
    plan_trade(
        quote.token_amount_out,
        intent.slippage_basis_points,
        quote.effective_base_cost,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_trade_five_percent() {
        let plan = plan_trade(42, 500, 1_000_000_000).unwrap();
        assert_eq!(plan.max_base_cost, 1_050_000_000);
        assert_eq!(plan.token_amount_out, 42);
    }

    #[test]
    fn test_plan_trade_never_below_input() {
        for slippage in [0u32, 1, 50, 500, 9_999, 10_000] {
            let plan = plan_trade(1, slippage, 1_000_000_000).unwrap();
            if slippage == 0 {
                assert_eq!(plan.max_base_cost, 1_000_000_000);
            } else {
                assert!(plan.max_base_cost > 1_000_000_000);
            }
        }
        assert_eq!(plan_trade(1, 10_000, 7).unwrap().max_base_cost, 14);
    }

    #[test]
    fn test_plan_trade_overflow_is_an_error() {
        assert_eq!(
            plan_trade(1, 10_000, u64::MAX),
            Err(BotError::ArithmeticOverflow("max sol cost"))
        );
    }

    #[test]
    fn test_plan_from_snapshot() {
        let snapshot = CurveSnapshot::new(30_000_000_000, 1_073_000_000_000_000, 100).unwrap();
        let intent = TradeIntent::new(1_000_000_000, 500, 0.0).unwrap();
        let plan = plan_from_snapshot(&snapshot, &intent).unwrap();
        assert_eq!(plan.token_amount_out, 34_266_774_193_549);
        assert_eq!(plan.max_base_cost, 1_050_000_000);
    }

    #[test]
    fn test_trade_intent_validation() {
        assert!(TradeIntent::new(0, 100, 0.0).is_err());
        assert!(TradeIntent::new(1, 10_001, 0.0).is_err());
        assert!(TradeIntent::new(1, 100, -0.1).is_err());
        assert!(TradeIntent::new(1, 100, f64::NAN).is_err());
        assert!(TradeIntent::new(1, 10_000, 0.001).is_ok());
    }
}
