//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors,
//! plus the statutory net/VAT/total breakdown carried on every claim amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub, Mul, Neg};
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    SAR,
    AED,
    BHD,
    USD,
    EUR,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::BHD => 3,
            _ => 2,
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::SAR => "SAR",
            Currency::AED => "AED",
            Currency::BHD => "BHD",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Breakdown inconsistent: expected vat {expected_vat}, total {expected_total}")]
    InconsistentBreakdown {
        expected_vat: Decimal,
        expected_total: Decimal,
    },

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount with associated currency
///
/// Money uses rust_decimal for precise arithmetic without floating-point
/// errors. Amounts are stored with 4 decimal places internally so that
/// rate applications do not lose precision before the final rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from an integer amount in minor units (e.g., halalas)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Rounds using banker's rounding (round half to even)
    pub fn round_bankers(&self, dp: u32) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                dp,
                rust_decimal::RoundingStrategy::MidpointNearestEven,
            ),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Multiplies by a scalar (e.g., for rate calculations)
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor, self.currency)
    }

    /// Returns this amount as a fraction of the given base amount
    ///
    /// Used for recovery-ratio classification; the base must share the
    /// currency and be non-zero.
    pub fn ratio_of(&self, base: &Money) -> Result<Decimal, MoneyError> {
        if self.currency != base.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                base.currency.to_string(),
            ));
        }
        if base.amount.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(self.amount / base.amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.code(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        self.multiply(factor)
    }
}

/// Represents a percentage rate (e.g., the statutory VAT rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.15 for 15%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.15 for 15%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 15.0 for 15%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4))
    }
}

/// The statutory net/VAT/total breakdown of a claim amount
///
/// Every monetary amount that crosses the claims boundary carries this
/// breakdown. The invariants `vat == round(net * rate)` and
/// `total == net + vat` hold at construction and the parts are not
/// individually mutable afterwards; externally supplied breakdowns must
/// pass [`AmountBreakdown::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBreakdown {
    net: Money,
    vat: Money,
    total: Money,
}

impl AmountBreakdown {
    /// Derives the breakdown from a net amount and the statutory VAT rate
    ///
    /// VAT is rounded to the currency's decimal places using banker's
    /// rounding before the total is formed, so the result always satisfies
    /// the breakdown invariant exactly.
    pub fn from_net(net: Money, statutory_rate: Rate) -> Self {
        let vat = statutory_rate
            .apply(&net)
            .round_bankers(net.currency().decimal_places());
        Self {
            net,
            vat,
            total: net + vat,
        }
    }

    /// Validates an externally supplied breakdown against the statutory rate
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InconsistentBreakdown` when the supplied vat or
    /// total disagree with the recomputed values, and `CurrencyMismatch`
    /// when the three parts do not share a currency.
    pub fn from_parts(
        net: Money,
        vat: Money,
        total: Money,
        statutory_rate: Rate,
    ) -> Result<Self, MoneyError> {
        if net.currency() != vat.currency() || net.currency() != total.currency() {
            return Err(MoneyError::CurrencyMismatch(
                net.currency().to_string(),
                vat.currency().to_string(),
            ));
        }
        let expected = Self::from_net(net, statutory_rate);
        if expected.vat != vat || expected.total != total {
            return Err(MoneyError::InconsistentBreakdown {
                expected_vat: expected.vat.amount(),
                expected_total: expected.total.amount(),
            });
        }
        Ok(expected)
    }

    /// Returns the net amount
    pub fn net(&self) -> Money {
        self.net
    }

    /// Returns the VAT amount
    pub fn vat(&self) -> Money {
        self.vat
    }

    /// Returns the total amount
    pub fn total(&self) -> Money {
        self.total
    }

    /// Returns the currency shared by all three parts
    pub fn currency(&self) -> Currency {
        self.net.currency()
    }

    /// Creates a zero breakdown in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            net: Money::zero(currency),
            vat: Money::zero(currency),
            total: Money::zero(currency),
        }
    }
}

impl fmt::Display for AmountBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (net {} + vat {})", self.total, self.net, self.vat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::SAR);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::SAR);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::SAR);
        assert_eq!(m.amount(), dec!(100.50));

        // BHD has three decimal places
        let b = Money::from_minor(10050, Currency::BHD);
        assert_eq!(b.amount(), dec!(10.050));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00), Currency::SAR);
        let b = Money::new(dec!(50.00), Currency::SAR);

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
    }

    #[test]
    fn test_currency_mismatch() {
        let sar = Money::new(dec!(100.00), Currency::SAR);
        let usd = Money::new(dec!(100.00), Currency::USD);

        let result = sar.checked_add(&usd);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_ratio_of() {
        let part = Money::new(dec!(250.00), Currency::SAR);
        let base = Money::new(dec!(1000.00), Currency::SAR);

        assert_eq!(part.ratio_of(&base).unwrap(), dec!(0.25));
        assert!(matches!(
            part.ratio_of(&Money::zero(Currency::SAR)),
            Err(MoneyError::DivisionByZero)
        ));
    }

    #[test]
    fn test_breakdown_from_net() {
        // net = 1000, statutory VAT 15% => vat = 150, total = 1150
        let net = Money::new(dec!(1000), Currency::SAR);
        let breakdown = AmountBreakdown::from_net(net, Rate::from_percentage(dec!(15)));

        assert_eq!(breakdown.vat().amount(), dec!(150.00));
        assert_eq!(breakdown.total().amount(), dec!(1150.00));
    }

    #[test]
    fn test_breakdown_from_parts_accepts_consistent() {
        let rate = Rate::from_percentage(dec!(15));
        let result = AmountBreakdown::from_parts(
            Money::new(dec!(200), Currency::SAR),
            Money::new(dec!(30), Currency::SAR),
            Money::new(dec!(230), Currency::SAR),
            rate,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_breakdown_from_parts_rejects_inconsistent() {
        let rate = Rate::from_percentage(dec!(15));
        let result = AmountBreakdown::from_parts(
            Money::new(dec!(200), Currency::SAR),
            Money::new(dec!(31), Currency::SAR),
            Money::new(dec!(231), Currency::SAR),
            rate,
        );
        assert!(matches!(result, Err(MoneyError::InconsistentBreakdown { .. })));
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(15.0));
        let amount = Money::new(dec!(1000.00), Currency::SAR);

        let vat = rate.apply(&amount);
        assert_eq!(vat.amount(), dec!(150.00));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn breakdown_invariant_holds_for_any_net(
            net_minor in 0i64..1_000_000_000i64,
            rate_bps in 0u32..5000u32
        ) {
            let net = Money::from_minor(net_minor, Currency::SAR);
            let rate = Rate::new(Decimal::new(rate_bps as i64, 4));
            let breakdown = AmountBreakdown::from_net(net, rate);

            prop_assert_eq!(breakdown.total(), breakdown.net() + breakdown.vat());
            let expected_vat = rate.apply(&net).round_bankers(2);
            prop_assert_eq!(breakdown.vat(), expected_vat);
        }

        #[test]
        fn money_arithmetic_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::SAR);
            let mb = Money::from_minor(b, Currency::SAR);
            let mc = Money::from_minor(c, Currency::SAR);

            prop_assert_eq!((ma + mb) + mc, ma + (mb + mc));
        }
    }
}
