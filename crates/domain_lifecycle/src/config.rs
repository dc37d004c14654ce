//! Jurisdiction configuration
//!
//! Statutory parameters vary by jurisdiction (window length, VAT rate,
//! timezone). Defaults match the Saudi regime; overrides come from the
//! environment with the `RCM_` prefix.

use std::str::FromStr;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{Currency, Rate, Timezone};

use crate::deadline::DeadlineCalculator;
use crate::error::LifecycleError;
use crate::rejection::RecoveryPolicy;

/// Statutory parameters for one jurisdiction
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionConfig {
    /// Statutory response window in calendar days
    pub statutory_window_days: u32,
    /// Fraction of the window after which records count as at-risk
    pub at_risk_fraction: f64,
    /// Statutory VAT rate in percent
    pub vat_rate_percent: f64,
    /// Recovered/total ratio at or above which a partial payment
    /// classifies as recovered
    pub partial_recovery_threshold: f64,
    /// IANA timezone name of the provider jurisdiction
    pub timezone: String,
    /// Settlement currency code
    pub currency: Currency,
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        Self {
            statutory_window_days: 30,
            at_risk_fraction: 0.75,
            vat_rate_percent: 15.0,
            partial_recovery_threshold: 0.5,
            timezone: "Asia/Riyadh".to_string(),
            currency: Currency::SAR,
        }
    }
}

impl JurisdictionConfig {
    /// Loads configuration from the environment over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("statutory_window_days", defaults.statutory_window_days as i64)?
            .set_default("at_risk_fraction", defaults.at_risk_fraction)?
            .set_default("vat_rate_percent", defaults.vat_rate_percent)?
            .set_default(
                "partial_recovery_threshold",
                defaults.partial_recovery_threshold,
            )?
            .set_default("timezone", defaults.timezone.as_str())?
            .set_default("currency", "SAR")?
            .add_source(config::Environment::with_prefix("RCM"))
            .build()?
            .try_deserialize()
    }

    /// Parses the configured timezone name
    pub fn provider_timezone(&self) -> Result<Timezone, LifecycleError> {
        Tz::from_str(&self.timezone)
            .map(Timezone::new)
            .map_err(|_| {
                LifecycleError::Configuration(format!("invalid timezone: {}", self.timezone))
            })
    }

    /// Returns the statutory VAT rate
    pub fn vat_rate(&self) -> Result<Rate, LifecycleError> {
        let percent = Decimal::try_from(self.vat_rate_percent).map_err(|e| {
            LifecycleError::Configuration(format!("invalid vat rate: {}", e))
        })?;
        Ok(Rate::from_percentage(percent))
    }

    /// Builds the deadline calculator for this jurisdiction
    pub fn deadline_calculator(&self) -> Result<DeadlineCalculator, LifecycleError> {
        let fraction = Decimal::try_from(self.at_risk_fraction).map_err(|e| {
            LifecycleError::Configuration(format!("invalid at-risk fraction: {}", e))
        })?;
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(LifecycleError::Configuration(format!(
                "at-risk fraction must be in (0, 1], got {}",
                fraction
            )));
        }
        Ok(DeadlineCalculator::new(
            self.statutory_window_days,
            fraction,
            self.provider_timezone()?,
        ))
    }

    /// Builds the partial-recovery classification policy
    pub fn recovery_policy(&self) -> Result<RecoveryPolicy, LifecycleError> {
        let threshold = Decimal::try_from(self.partial_recovery_threshold).map_err(|e| {
            LifecycleError::Configuration(format!("invalid recovery threshold: {}", e))
        })?;
        if threshold < Decimal::ZERO || threshold > Decimal::ONE {
            return Err(LifecycleError::Configuration(format!(
                "recovery threshold must be in [0, 1], got {}",
                threshold
            )));
        }
        Ok(RecoveryPolicy {
            partial_recovery_threshold: threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_match_saudi_regime() {
        let config = JurisdictionConfig::default();

        assert_eq!(config.statutory_window_days, 30);
        assert_eq!(config.vat_rate().unwrap().as_percentage(), dec!(15.00));
        assert_eq!(config.currency, Currency::SAR);
        assert!(config.provider_timezone().is_ok());
    }

    #[test]
    fn test_invalid_timezone_is_configuration_error() {
        let config = JurisdictionConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.provider_timezone(),
            Err(LifecycleError::Configuration(_))
        ));
    }

    #[test]
    fn test_fraction_bounds_enforced() {
        let config = JurisdictionConfig {
            at_risk_fraction: 1.5,
            ..Default::default()
        };

        assert!(matches!(
            config.deadline_calculator(),
            Err(LifecycleError::Configuration(_))
        ));
    }

    #[test]
    fn test_recovery_policy_from_config() {
        let config = JurisdictionConfig {
            partial_recovery_threshold: 0.6,
            ..Default::default()
        };

        let policy = config.recovery_policy().unwrap();
        assert_eq!(policy.partial_recovery_threshold, dec!(0.6));
    }
}
