use crate::error::Error;
use crate::storage::{FixedPricing, PricingPolicy, TieredPricing, BASIS_POINTS};

/// Principal and fee pulled from a payer for one buy or trade
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Charge {
    pub principal: i128,
    pub fee: i128,
}

impl Charge {
    pub fn total(&self) -> Result<i128, Error> {
        self.principal
            .checked_add(self.fee)
            .ok_or(Error::ArithmeticOverflow)
    }
}

/// Reject basis-point values outside [0, 10000]
pub fn check_bps(bps: u32) -> Result<u32, Error> {
    if bps > BASIS_POINTS {
        return Err(Error::InvalidBasisPoints);
    }
    Ok(bps)
}

/// Calculate a basis-point share of an amount, truncated toward zero
///
/// Formula: share = amount × bps / 10,000
///
/// Example:
/// - amount: 200
/// - bps: 500 (5%)
/// - share: 200 × 500 / 10,000 = 10
pub fn bps_share(amount: i128, bps: u32) -> Result<i128, Error> {
    amount
        .checked_mul(bps as i128)
        .and_then(|v| v.checked_div(BASIS_POINTS as i128))
        .ok_or(Error::ArithmeticOverflow)
}

/// Calculate what a payer owes for `count` units at `unit_price`
///
/// Formula: principal = unit_price × count, fee = principal × fee_bps / 10,000
pub fn charge(unit_price: i128, count: u32, fee_bps: u32) -> Result<Charge, Error> {
    let principal = unit_price
        .checked_mul(count as i128)
        .ok_or(Error::ArithmeticOverflow)?;
    price_with_fee(principal, fee_bps)
}

/// Split a single price into the seller's part and the fee on top
pub fn price_with_fee(price: i128, fee_bps: u32) -> Result<Charge, Error> {
    Ok(Charge {
        principal: price,
        fee: bps_share(price, fee_bps)?,
    })
}

/// Calculate the redemption payout for claimed principal
///
/// Formula: payout = principal × (1 + profit_bps / 10,000)
///
/// Example:
/// - principal: 700
/// - profit: 5000 (50%)
/// - payout: 700 + 350 = 1,050
pub fn redemption_payout(principal: i128, profit_bps: u32) -> Result<i128, Error> {
    principal
        .checked_add(bps_share(principal, profit_bps)?)
        .ok_or(Error::ArithmeticOverflow)
}

impl PricingPolicy {
    pub fn tiered(&self) -> Result<&TieredPricing, Error> {
        match self {
            PricingPolicy::Tiered(tiered) => Ok(tiered),
            PricingPolicy::Fixed(_) => Err(Error::PricingModeMismatch),
        }
    }

    pub fn fixed(&self) -> Result<&FixedPricing, Error> {
        match self {
            PricingPolicy::Fixed(fixed) => Ok(fixed),
            PricingPolicy::Tiered(_) => Err(Error::PricingModeMismatch),
        }
    }

    pub fn tiered_mut(&mut self) -> Result<&mut TieredPricing, Error> {
        match self {
            PricingPolicy::Tiered(tiered) => Ok(tiered),
            PricingPolicy::Fixed(_) => Err(Error::PricingModeMismatch),
        }
    }

    pub fn fixed_mut(&mut self) -> Result<&mut FixedPricing, Error> {
        match self {
            PricingPolicy::Fixed(fixed) => Ok(fixed),
            PricingPolicy::Tiered(_) => Err(Error::PricingModeMismatch),
        }
    }

    /// Listing and trading only exist under tiered pricing
    pub fn supports_trading(&self) -> bool {
        matches!(self, PricingPolicy::Tiered(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::UNIT;

    #[test]
    fn test_buy_charge() {
        let charge = charge(100 * UNIT, 2, 500).unwrap();

        // Expected: 200 principal, 5% fee = 10
        assert_eq!(charge.principal, 200 * UNIT);
        assert_eq!(charge.fee, 10 * UNIT);
        assert_eq!(charge.total().unwrap(), 210 * UNIT);
    }

    #[test]
    fn test_trade_fee() {
        let charge = price_with_fee(5_000 * UNIT, 100).unwrap();

        // Expected: 5,000 × 1% = 50
        assert_eq!(charge.fee, 50 * UNIT);
        assert_eq!(charge.total().unwrap(), 5_050 * UNIT);
    }

    #[test]
    fn test_fee_truncates_toward_zero() {
        // 199 × 0.5% = 0.995 → 0
        assert_eq!(bps_share(199, 50).unwrap(), 0);
        assert_eq!(bps_share(201, 50).unwrap(), 1);
    }

    #[test]
    fn test_redemption_payout() {
        // Expected: 700 × 150% = 1,050
        assert_eq!(redemption_payout(700 * UNIT, 5000).unwrap(), 1_050 * UNIT);
        assert_eq!(redemption_payout(300 * UNIT, 0).unwrap(), 300 * UNIT);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(charge(i128::MAX, 2, 0), Err(Error::ArithmeticOverflow));
        assert_eq!(bps_share(i128::MAX, 2), Err(Error::ArithmeticOverflow));
    }

    #[test]
    fn test_check_bps() {
        assert_eq!(check_bps(0), Ok(0));
        assert_eq!(check_bps(10_000), Ok(10_000));
        assert_eq!(check_bps(10_001), Err(Error::InvalidBasisPoints));
    }

    #[test]
    fn test_policy_mode_accessors() {
        let tiered = PricingPolicy::Tiered(TieredPricing {
            max_value_to_raise: 5_000 * UNIT,
        });
        assert!(tiered.tiered().is_ok());
        assert_eq!(tiered.fixed(), Err(Error::PricingModeMismatch));
        assert!(tiered.supports_trading());

        let fixed = PricingPolicy::Fixed(FixedPricing {
            unit_value: 100 * UNIT,
            max_mint_per_user: 5,
        });
        assert_eq!(fixed.fixed().unwrap().max_mint_per_user, 5);
        assert_eq!(fixed.tiered(), Err(Error::PricingModeMismatch));
        assert!(!fixed.supports_trading());
    }
}
