//! Conversions between human-denominated amounts and ledger integer units.
//!
//! This is the only place floats are turned into integers. Pricing, planning
//! and instruction assembly work purely on the integers produced here.

use crate::constants::compute_budget::{
    LAMPORTS_PER_SOL, MIN_COMPUTE_UNIT_PRICE, PRIORITY_FEE_MICRO_LAMPORTS_PER_SOL,
};
use crate::errors::{BotError, BotResult};

// 2^64, first f64 that no longer fits in a u64
const U64_LIMIT_F64: f64 = 18_446_744_073_709_551_616.0;

fn floor_to_u64(value: f64, what: &'static str) -> BotResult<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(BotError::ArithmeticOverflow(what));
    }
    let floored = value.floor();
    if floored >= U64_LIMIT_F64 {
        return Err(BotError::ArithmeticOverflow(what));
    }
    Ok(floored as u64)
}

/// `floor(sol * 1e9)`
pub fn sol_to_lamports(sol: f64) -> BotResult<u64> {
    floor_to_u64(sol * LAMPORTS_PER_SOL as f64, "lamports from SOL amount")
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// `floor(pct * 100)`, e.g. 5% -> 500 bps. Callers validate the 0..=100 range.
pub fn slippage_percentage_to_bps(percentage: f64) -> BotResult<u32> {
    let bps = floor_to_u64(percentage * 100.0, "slippage basis points")?;
    u32::try_from(bps).map_err(|_| BotError::ArithmeticOverflow("slippage basis points"))
}

/// Priority fee in SOL to micro-lamports per compute unit, never below 1.
pub fn priority_fee_to_micro_lamports(priority_fee_sol: f64) -> BotResult<u64> {
    let micro = floor_to_u64(
        priority_fee_sol * PRIORITY_FEE_MICRO_LAMPORTS_PER_SOL,
        "compute unit price",
    )?;
    Ok(micro.max(MIN_COMPUTE_UNIT_PRICE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_to_lamports_floors() {
        assert_eq!(sol_to_lamports(1.0).unwrap(), 1_000_000_000);
        assert_eq!(sol_to_lamports(0.5).unwrap(), 500_000_000);
        assert_eq!(sol_to_lamports(0.0000000019).unwrap(), 1);
    }

    #[test]
    fn test_sol_to_lamports_rejects_garbage() {
        assert!(sol_to_lamports(-1.0).is_err());
        assert!(sol_to_lamports(f64::NAN).is_err());
        assert!(sol_to_lamports(f64::INFINITY).is_err());
        assert!(sol_to_lamports(1e12).is_err());
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
    }

    #[test]
    fn test_slippage_percentage_to_bps() {
        assert_eq!(slippage_percentage_to_bps(5.0).unwrap(), 500);
        assert_eq!(slippage_percentage_to_bps(0.0).unwrap(), 0);
        assert_eq!(slippage_percentage_to_bps(100.0).unwrap(), 10_000);
        assert_eq!(slippage_percentage_to_bps(2.5).unwrap(), 250);
    }

    #[test]
    fn test_priority_fee_clamped_to_one() {
        assert_eq!(priority_fee_to_micro_lamports(0.0001).unwrap(), 500_000);
        assert_eq!(priority_fee_to_micro_lamports(1e-12).unwrap(), 1);
    }
}
