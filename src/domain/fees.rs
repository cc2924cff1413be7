//! Trade fee calculation.
//!
//! Every recorded trade pays a flat 0.1% fee on its amount, rounded to
//! six decimal places. The arithmetic runs in `Decimal` so the rounded
//! value is exact before it is handed back to the f64 ledger.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Flat fee rate applied to every trade (0.1%).
pub const TRADE_FEE_RATE: Decimal = dec!(0.001);

/// Decimal places kept on a computed fee.
pub const FEE_DECIMALS: u32 = 6;

/// Flat-rate fee calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCalculator {
    rate: Decimal,
    decimals: u32,
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::flat()
    }
}

impl FeeCalculator {
    /// Calculator with a custom rate and precision.
    pub const fn new(rate: Decimal, decimals: u32) -> Self {
        Self { rate, decimals }
    }

    /// The dashboard's standard 0.1% / 6dp fee schedule.
    pub const fn flat() -> Self {
        Self::new(TRADE_FEE_RATE, FEE_DECIMALS)
    }

    /// Fee owed on `amount`.
    ///
    /// Always finite and never negative. Non-finite, non-positive or
    /// unrepresentable amounts pay nothing; validated amounts are capped
    /// at [`MAX_TRADE_AMOUNT`](crate::domain::request::MAX_TRADE_AMOUNT),
    /// far inside `Decimal`'s range.
    pub fn fee(&self, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        Decimal::from_f64(amount)
            .and_then(|amount| amount.checked_mul(self.rate))
            .map(|fee| {
                fee.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero)
            })
            .and_then(|fee| fee.to_f64())
            .filter(|fee| fee.is_finite())
            .map_or(0.0, |fee| fee.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_on_unit_amount() {
        assert_eq!(FeeCalculator::flat().fee(1.0), 0.001);
    }

    #[test]
    fn test_fee_rounds_to_six_places() {
        // 0.0012345 * 0.001 = 0.0000012345 -> 0.000001
        assert_eq!(FeeCalculator::flat().fee(0.001_234_5), 0.000_001);
        assert_eq!(FeeCalculator::flat().fee(123.456_789), 0.123_457);
    }

    #[test]
    fn test_fee_never_negative() {
        let fees = FeeCalculator::flat();
        assert_eq!(fees.fee(-5.0), 0.0);
        assert_eq!(fees.fee(0.0), 0.0);
        assert_eq!(fees.fee(f64::NAN), 0.0);
        assert_eq!(fees.fee(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_out_of_range_amount_stays_finite() {
        let fee = FeeCalculator::flat().fee(1e306);
        assert!(fee.is_finite());
        assert_eq!(fee, 0.0);
    }

    #[test]
    fn test_fee_at_amount_cap() {
        let fee = FeeCalculator::flat().fee(crate::domain::request::MAX_TRADE_AMOUNT);
        assert_eq!(fee, 1_000_000_000_000.0);
    }

    #[test]
    fn test_custom_rate() {
        let fees = FeeCalculator::new(dec!(0.01), 2);
        assert_eq!(fees.fee(250.0), 2.5);
    }
}
