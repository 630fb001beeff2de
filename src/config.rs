//! Platform configuration
//!
//! The configuration is a single value owned by the ledger. Admin setters
//! build a candidate copy, validate it as a whole, and only then store it,
//! so a stored configuration is always within range.

use odra::casper_types::U256;

use crate::errors::Error;
use crate::types::constants::*;

/// Global parameters read by every settlement
#[odra::odra_type]
pub struct PlatformConfig {
    /// Platform cut of each purchase, 0-20
    pub platform_fee_percent: u64,
    /// Referrer cut of each referred purchase, 0-20
    pub referral_reward_percent: u64,
    /// Refund window in milliseconds
    pub refund_period: u64,
    /// Price of 30 days of unlimited access
    pub monthly_subscription_price: U256,
    /// Price of 365 days of unlimited access
    pub yearly_subscription_price: U256,
    /// Minimum number of courses for a bulk checkout
    pub bulk_discount_threshold: u64,
    /// Discount applied to the bulk checkout sum, 0-100
    pub bulk_discount_percent: u64,
    /// Whether creating a course requires certification
    pub require_certification: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        let unit = U256::exp10(TOKEN_DECIMALS as usize);
        Self {
            platform_fee_percent: 5,
            referral_reward_percent: 5,
            refund_period: 7 * DAY,
            monthly_subscription_price: unit * U256::from(100u64),
            yearly_subscription_price: unit * U256::from(1_000u64),
            bulk_discount_threshold: 3,
            bulk_discount_percent: 10,
            require_certification: false,
        }
    }
}

impl PlatformConfig {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.platform_fee_percent > MAX_PLATFORM_FEE_PERCENT {
            return Err(Error::FeeTooHigh);
        }
        if self.referral_reward_percent > MAX_REFERRAL_REWARD_PERCENT {
            return Err(Error::ReferralRewardTooHigh);
        }
        if self.refund_period == 0 {
            return Err(Error::InvalidRefundPeriod);
        }
        if self.monthly_subscription_price.is_zero() || self.yearly_subscription_price.is_zero() {
            return Err(Error::InvalidSubscriptionPrice);
        }
        if self.bulk_discount_threshold == 0 {
            return Err(Error::InvalidBulkThreshold);
        }
        if self.bulk_discount_percent > MAX_BULK_DISCOUNT_PERCENT {
            return Err(Error::DiscountTooHigh);
        }
        Ok(())
    }

    /// Copy with a new platform fee
    pub fn with_platform_fee(&self, percent: u64) -> Self {
        Self {
            platform_fee_percent: percent,
            ..self.clone()
        }
    }

    /// Copy with a new referral reward
    pub fn with_referral_reward(&self, percent: u64) -> Self {
        Self {
            referral_reward_percent: percent,
            ..self.clone()
        }
    }

    /// Copy with a new refund window
    pub fn with_refund_period(&self, period: u64) -> Self {
        Self {
            refund_period: period,
            ..self.clone()
        }
    }

    /// Copy with new subscription prices
    pub fn with_subscription_prices(&self, monthly: U256, yearly: U256) -> Self {
        Self {
            monthly_subscription_price: monthly,
            yearly_subscription_price: yearly,
            ..self.clone()
        }
    }

    /// Copy with new bulk discount settings
    pub fn with_bulk_discount(&self, threshold: u64, percent: u64) -> Self {
        Self {
            bulk_discount_threshold: threshold,
            bulk_discount_percent: percent,
            ..self.clone()
        }
    }

    /// Copy with the certification gate switched
    pub fn with_require_certification(&self, required: bool) -> Self {
        Self {
            require_certification: required,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlatformConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.platform_fee_percent, 5);
        assert_eq!(config.referral_reward_percent, 5);
        assert_eq!(config.refund_period, 7 * DAY);
        assert_eq!(config.bulk_discount_threshold, 3);
        assert_eq!(
            config.monthly_subscription_price,
            U256::from(100u64) * U256::exp10(18)
        );
        assert!(!config.require_certification);
    }

    #[test]
    fn test_fee_range_is_inclusive() {
        let config = PlatformConfig::default();
        assert!(config.with_platform_fee(20).validate().is_ok());
        assert!(matches!(
            config.with_platform_fee(21).validate(),
            Err(Error::FeeTooHigh)
        ));
        assert!(config.with_referral_reward(0).validate().is_ok());
        assert!(matches!(
            config.with_referral_reward(25).validate(),
            Err(Error::ReferralRewardTooHigh)
        ));
    }

    #[test]
    fn test_bulk_settings_validation() {
        let config = PlatformConfig::default();
        assert!(config.with_bulk_discount(1, 100).validate().is_ok());
        assert!(matches!(
            config.with_bulk_discount(0, 10).validate(),
            Err(Error::InvalidBulkThreshold)
        ));
        assert!(matches!(
            config.with_bulk_discount(3, 101).validate(),
            Err(Error::DiscountTooHigh)
        ));
    }

    #[test]
    fn test_rejects_zero_prices_and_period() {
        let config = PlatformConfig::default();
        assert!(matches!(
            config.with_subscription_prices(U256::zero(), U256::one()).validate(),
            Err(Error::InvalidSubscriptionPrice)
        ));
        assert!(matches!(
            config.with_refund_period(0).validate(),
            Err(Error::InvalidRefundPeriod)
        ));
    }

    #[test]
    fn test_with_leaves_other_fields_untouched() {
        let config = PlatformConfig::default().with_require_certification(true);
        assert!(config.require_certification);
        assert_eq!(config.platform_fee_percent, 5);
    }
}
