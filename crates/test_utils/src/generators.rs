//! Property-Based Test Generators
//!
//! Proptest strategies that respect domain invariants, plus fake-data
//! helpers for human-readable fields.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money};

/// Strategy for settlement currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::SAR),
        Just(Currency::AED),
        Just(Currency::BHD),
        Just(Currency::USD),
        Just(Currency::EUR),
    ]
}

/// Strategy for non-negative net amounts in minor units
pub fn net_amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy for positive SAR money values
pub fn sar_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64).prop_map(|minor| Money::from_minor(minor, Currency::SAR))
}

/// Strategy for recovery ratios in [0, 1] with 4 decimal places
pub fn ratio_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10000u32).prop_map(|n| Decimal::new(n as i64, 4))
}

/// Strategy for exchange rejection reason codes
pub fn reason_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("DOC-01".to_string()),
        Just("DOC-02".to_string()),
        Just("AUTH-01".to_string()),
        Just("ELIG-01".to_string()),
        Just("CODE-01".to_string()),
        Just("UNBUNDLED".to_string()),
        Just("DUP-01".to_string()),
    ]
}

/// Strategy for received dates across 2025
pub fn received_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().date_naive() + Duration::days(days)
    })
}

/// Strategy for service complexity levels (1 = trivial, 5 = critical)
pub fn complexity_strategy() -> impl Strategy<Value = u8> {
    1u8..=5u8
}

/// A plausible physician display name
pub fn physician_name() -> String {
    Name().fake()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn ratios_stay_in_unit_interval(ratio in ratio_strategy()) {
            prop_assert!(ratio >= Decimal::ZERO && ratio <= Decimal::ONE);
        }

        #[test]
        fn sar_money_is_positive(money in sar_money_strategy()) {
            prop_assert!(money.is_positive());
            prop_assert_eq!(money.currency(), Currency::SAR);
        }
    }

    #[test]
    fn test_physician_name_non_empty() {
        assert!(!physician_name().is_empty());
    }
}
