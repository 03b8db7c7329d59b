//! Fixed-point money helpers.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MAX_MONEY_AMOUNT, MONEY_SCALE};
use crate::errors::{Error, Result};

/// Rounds an amount to `MONEY_SCALE` places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates an amount to `MONEY_SCALE` places, toward zero.
pub fn floor_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero)
}

/// Parses a stored or submitted amount, naming the field on failure.
pub fn parse_money(value: &str, field: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| Error::invalid_input(format!("{} '{}' is not a number: {}", field, value, e)))
}

/// Fails unless `amount` is strictly positive.
pub fn ensure_positive(amount: Decimal, field: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}

/// Fails when `amount` exceeds `MAX_MONEY_AMOUNT`.
pub fn ensure_within_limit(amount: Decimal, field: &str) -> Result<()> {
    if amount > MAX_MONEY_AMOUNT {
        return Err(Error::invalid_input(format!(
            "{} must not exceed {}",
            field, MAX_MONEY_AMOUNT
        )));
    }
    Ok(())
}

/// A money input: strictly positive and within `MAX_MONEY_AMOUNT`.
pub fn ensure_amount(amount: Decimal, field: &str) -> Result<()> {
    ensure_positive(amount, field)?;
    ensure_within_limit(amount, field)
}

/// `a + b`, or a validation error when the sum leaves the decimal range.
pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| Error::invalid_input(format!("Amount {} + {} is out of range", a, b)))
}

/// `a - b`, or a validation error when the difference leaves the decimal range.
pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| Error::invalid_input(format!("Amount {} - {} is out of range", a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(108.335)), dec!(108.34));
        assert_eq!(round_money(dec!(108.3333)), dec!(108.33));
        assert_eq!(floor_money(dec!(0.005)), dec!(0.00));
        assert_eq!(floor_money(dec!(66.6666)), dec!(66.66));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money(" 12.50 ", "amount").unwrap(), dec!(12.50));
        assert!(parse_money("twelve", "amount").is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive(dec!(0.01), "amount").is_ok());
        assert!(ensure_positive(Decimal::ZERO, "amount").is_err());
        assert!(ensure_positive(dec!(-5), "amount").is_err());
    }

    #[test]
    fn test_ensure_amount_caps_large_values() {
        assert!(ensure_amount(MAX_MONEY_AMOUNT, "amount").is_ok());
        assert!(ensure_amount(MAX_MONEY_AMOUNT + dec!(0.01), "amount").is_err());
        assert!(ensure_amount(Decimal::MAX, "amount").is_err());
        assert!(ensure_amount(Decimal::ZERO, "amount").is_err());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_add(dec!(1.5), dec!(2)).unwrap(), dec!(3.5));
        assert_eq!(checked_sub(dec!(1.5), dec!(2)).unwrap(), dec!(-0.5));

        let err = checked_add(Decimal::MAX, dec!(1)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(checked_sub(Decimal::MIN, dec!(1)).is_err());
    }
}
