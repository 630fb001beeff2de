//! Settlement arithmetic
//!
//! Pure functions that decide how a payment is split. Nothing here touches
//! storage or moves tokens; the ledger calls these with the current
//! [`PlatformConfig`] and then routes funds according to the result.
//!
//! All percentages are applied with floor division. The instructor leg is
//! computed as the remainder, so for any price
//! `platform_fee + referral_reward + instructor_payment == price` holds exactly.

use odra::prelude::*;
use odra::casper_types::U256;

use crate::config::PlatformConfig;
use crate::errors::Error;
use crate::types::constants::{PERCENT_DENOMINATOR, RATING_SCALE};

/// How a single course price is divided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Split {
    /// Platform cut
    pub platform_fee: U256,
    /// Referrer cut, zero when there is no eligible referrer
    pub referral_reward: U256,
    /// Remainder paid to the instructor
    pub instructor_payment: U256,
}

impl Split {
    /// Sum of the three legs
    pub fn total(&self) -> U256 {
        self.platform_fee + self.referral_reward + self.instructor_payment
    }
}

/// Outcome of a bulk checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSettlement {
    /// Amount charged to the buyer after the discount
    pub total_charged: U256,
    /// Per-course split on the undiscounted price, in request order
    pub splits: Vec<Split>,
    /// Per-course share of `total_charged`, recorded as the price paid
    pub price_shares: Vec<U256>,
    /// Sum of instructor payments
    pub instructor_total: U256,
    /// Sum of referral rewards
    pub referral_total: U256,
    /// Amount left over for the platform
    pub platform_payout: U256,
    /// Amount the ledger reserve must add when the discount exceeds the platform legs
    pub reserve_draw: U256,
}

/// `amount * percent / 100`, floored.
pub fn percent_of(amount: U256, percent: u64) -> Result<U256, Error> {
    amount
        .checked_mul(U256::from(percent))
        .map(|scaled| scaled / U256::from(PERCENT_DENOMINATOR))
        .ok_or(Error::ArithmeticOverflow)
}

/// Split a full-price purchase.
///
/// `referred` must already account for the referrer rules (present and not
/// the buyer); when false the referral leg is zero.
pub fn split_purchase(price: U256, config: &PlatformConfig, referred: bool) -> Result<Split, Error> {
    let platform_fee = percent_of(price, config.platform_fee_percent)?;
    let referral_reward = if referred {
        percent_of(price, config.referral_reward_percent)?
    } else {
        U256::zero()
    };
    let instructor_payment = price
        .checked_sub(platform_fee)
        .and_then(|rest| rest.checked_sub(referral_reward))
        .ok_or(Error::ArithmeticOverflow)?;

    Ok(Split {
        platform_fee,
        referral_reward,
        instructor_payment,
    })
}

/// Discounted total for a bulk checkout, discount applied once on the sum.
pub fn discounted_total(sum: U256, config: &PlatformConfig) -> Result<U256, Error> {
    let discount = percent_of(sum, config.bulk_discount_percent)?;
    sum.checked_sub(discount).ok_or(Error::ArithmeticOverflow)
}

/// Divide `total` across `prices` in proportion, floored, with the last
/// entry taking the rounding residue so the shares sum to `total`.
pub fn allocate_shares(prices: &[U256], total: U256) -> Result<Vec<U256>, Error> {
    let mut sum = U256::zero();
    for price in prices {
        sum = sum.checked_add(*price).ok_or(Error::ArithmeticOverflow)?;
    }

    let mut shares = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return Ok(shares);
    }
    if sum.is_zero() {
        shares.resize(prices.len(), U256::zero());
        return Ok(shares);
    }

    let mut allocated = U256::zero();
    for price in &prices[..prices.len() - 1] {
        let share = price
            .checked_mul(total)
            .map(|scaled| scaled / sum)
            .ok_or(Error::ArithmeticOverflow)?;
        allocated = allocated.checked_add(share).ok_or(Error::ArithmeticOverflow)?;
        shares.push(share);
    }
    shares.push(total.checked_sub(allocated).ok_or(Error::ArithmeticOverflow)?);
    Ok(shares)
}

/// Settle a bulk checkout.
///
/// Instructors and referrers are paid on each course's undiscounted price;
/// the discount comes out of the platform's share. When the discount is
/// larger than the platform's share, `reserve_draw` is the amount the
/// ledger must add from its own reserve.
pub fn settle_bulk(
    prices: &[U256],
    config: &PlatformConfig,
    referred: bool,
) -> Result<BulkSettlement, Error> {
    let mut sum = U256::zero();
    let mut splits = Vec::with_capacity(prices.len());
    let mut instructor_total = U256::zero();
    let mut referral_total = U256::zero();

    for price in prices {
        let split = split_purchase(*price, config, referred)?;
        sum = sum.checked_add(*price).ok_or(Error::ArithmeticOverflow)?;
        instructor_total = instructor_total
            .checked_add(split.instructor_payment)
            .ok_or(Error::ArithmeticOverflow)?;
        referral_total = referral_total
            .checked_add(split.referral_reward)
            .ok_or(Error::ArithmeticOverflow)?;
        splits.push(split);
    }

    let total_charged = discounted_total(sum, config)?;
    let price_shares = allocate_shares(prices, total_charged)?;

    let owed = instructor_total
        .checked_add(referral_total)
        .ok_or(Error::ArithmeticOverflow)?;
    let (platform_payout, reserve_draw) = if total_charged >= owed {
        (total_charged - owed, U256::zero())
    } else {
        (U256::zero(), owed - total_charged)
    };

    Ok(BulkSettlement {
        total_charged,
        splits,
        price_shares,
        instructor_total,
        referral_total,
        platform_payout,
        reserve_draw,
    })
}

/// Amount returned to the buyer on refund: the price paid minus the platform fee.
pub fn refund_amount(price_paid: U256, config: &PlatformConfig) -> Result<U256, Error> {
    let fee = percent_of(price_paid, config.platform_fee_percent)?;
    price_paid.checked_sub(fee).ok_or(Error::ArithmeticOverflow)
}

/// Average rating scaled by 100 and truncated; 0 when there are no ratings.
pub fn scaled_average(total_rating_sum: u64, rating_count: u64) -> u64 {
    if rating_count == 0 {
        return 0;
    }
    let scaled = total_rating_sum as u128 * RATING_SCALE as u128 / rating_count as u128;
    scaled as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(fee: u64, referral: u64) -> PlatformConfig {
        PlatformConfig::default()
            .with_platform_fee(fee)
            .with_referral_reward(referral)
    }

    fn amounts(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    #[test]
    fn test_split_with_referrer() {
        let split = split_purchase(U256::from(100u64), &config(5, 5), true).unwrap();
        assert_eq!(split.platform_fee, U256::from(5u64));
        assert_eq!(split.referral_reward, U256::from(5u64));
        assert_eq!(split.instructor_payment, U256::from(90u64));
        assert_eq!(split.total(), U256::from(100u64));
    }

    #[test]
    fn test_split_without_referrer() {
        let split = split_purchase(U256::from(100u64), &config(5, 5), false).unwrap();
        assert_eq!(split.referral_reward, U256::zero());
        assert_eq!(split.instructor_payment, U256::from(95u64));
    }

    #[test]
    fn test_split_truncates_toward_instructor() {
        // 7% of 99 is 6.93 and 3% of 99 is 2.97; both floor.
        let split = split_purchase(U256::from(99u64), &config(7, 3), true).unwrap();
        assert_eq!(split.platform_fee, U256::from(6u64));
        assert_eq!(split.referral_reward, U256::from(2u64));
        assert_eq!(split.instructor_payment, U256::from(91u64));
    }

    #[test]
    fn test_split_overflow_is_reported() {
        let result = split_purchase(U256::MAX, &config(20, 0), false);
        assert!(matches!(result, Err(Error::ArithmeticOverflow)));
    }

    #[test]
    fn test_bulk_three_courses_ten_percent() {
        let prices = amounts(&[100, 100, 100]);
        let bulk = settle_bulk(&prices, &config(5, 5), false).unwrap();
        assert_eq!(bulk.total_charged, U256::from(270u64));
        for split in &bulk.splits {
            assert_eq!(split.instructor_payment, U256::from(95u64));
        }
        assert_eq!(bulk.instructor_total, U256::from(285u64));
        assert_eq!(bulk.platform_payout, U256::zero());
        assert_eq!(bulk.reserve_draw, U256::from(15u64));
        assert_eq!(bulk.price_shares, amounts(&[90, 90, 90]));
    }

    #[test]
    fn test_bulk_with_small_discount_pays_platform() {
        let prices = amounts(&[100, 200, 300]);
        let cfg = config(10, 5).with_bulk_discount(3, 5);
        let bulk = settle_bulk(&prices, &cfg, true).unwrap();
        // 600 - 5% = 570; instructors 85 + 170 + 255 = 510; referrals 5 + 10 + 15 = 30
        assert_eq!(bulk.total_charged, U256::from(570u64));
        assert_eq!(bulk.instructor_total, U256::from(510u64));
        assert_eq!(bulk.referral_total, U256::from(30u64));
        assert_eq!(bulk.platform_payout, U256::from(30u64));
        assert_eq!(bulk.reserve_draw, U256::zero());
    }

    #[test]
    fn test_shares_give_residue_to_last() {
        let shares = allocate_shares(&amounts(&[1, 1, 1]), U256::from(2u64)).unwrap();
        assert_eq!(shares, amounts(&[0, 0, 2]));
    }

    #[test]
    fn test_refund_keeps_platform_fee() {
        let refund = refund_amount(U256::from(100u64), &config(5, 5)).unwrap();
        assert_eq!(refund, U256::from(95u64));
    }

    #[test]
    fn test_scaled_average() {
        assert_eq!(scaled_average(8, 2), 400);
        assert_eq!(scaled_average(0, 0), 0);
        // 13 / 3 = 4.333.. keeps two implied decimals
        assert_eq!(scaled_average(13, 3), 433);
    }

    proptest! {
        #[test]
        fn split_conserves_price(
            price in any::<u128>(),
            fee in 0u64..=20,
            referral in 0u64..=20,
            referred in any::<bool>(),
        ) {
            let price = U256::from(price);
            let split = split_purchase(price, &config(fee, referral), referred).unwrap();
            prop_assert_eq!(split.total(), price);
            prop_assert!(split.platform_fee <= price);
            if !referred {
                prop_assert!(split.referral_reward.is_zero());
            }
        }

        #[test]
        fn bulk_balances_every_leg(
            prices in proptest::collection::vec(1u64..1_000_000_000, 1..8),
            fee in 0u64..=20,
            referral in 0u64..=20,
            discount in 0u64..=100,
            referred in any::<bool>(),
        ) {
            let prices = amounts(&prices);
            let cfg = config(fee, referral).with_bulk_discount(1, discount);
            let bulk = settle_bulk(&prices, &cfg, referred).unwrap();

            let shares: U256 = bulk.price_shares.iter().fold(U256::zero(), |acc, s| acc + *s);
            prop_assert_eq!(shares, bulk.total_charged);
            prop_assert_eq!(
                bulk.total_charged + bulk.reserve_draw,
                bulk.instructor_total + bulk.referral_total + bulk.platform_payout
            );
            prop_assert!(bulk.platform_payout.is_zero() || bulk.reserve_draw.is_zero());
        }

        #[test]
        fn refund_never_exceeds_price(price in any::<u128>(), fee in 0u64..=20) {
            let price = U256::from(price);
            let refund = refund_amount(price, &config(fee, 0)).unwrap();
            prop_assert!(refund <= price);
        }
    }
}
