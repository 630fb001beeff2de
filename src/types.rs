//! Data type definitions for the Course Ledger

use odra::prelude::*;
use odra::casper_types::U256;

/// A named tag courses attach to
#[odra::odra_type]
#[derive(Default)]
pub struct Category {
    /// Unique identifier, starting at 1
    pub id: u64,
    /// Display name
    pub name: String,
    /// Whether new courses may attach to this category
    pub active: bool,
}

/// A course listed in the catalog
#[odra::odra_type]
pub struct Course {
    /// Unique identifier for this course
    pub id: u64,
    /// Title of the course
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Reference to the cover image (URL or IPFS link)
    pub cover_ref: String,
    /// Price in payment token units
    pub price: U256,
    /// Address of the instructor who created this course
    pub instructor: Address,
    /// Whether this course is open for new purchases
    pub active: bool,
    /// Block time (ms) when the course was created
    pub created_at: u64,
    /// Number of successful purchases
    pub total_students: u64,
    /// Category id, 0 when uncategorized
    pub category_id: u64,
    /// Sum of all rating scores
    pub total_rating_sum: u64,
    /// Number of ratings
    pub rating_count: u64,
}

/// Record of a purchase, keyed by (course id, buyer)
#[odra::odra_type]
pub struct PurchaseRecord {
    /// ID of the purchased course
    pub course_id: u64,
    /// Address of the buyer
    pub buyer: Address,
    /// Block time (ms) of the purchase
    pub purchase_time: u64,
    /// Amount charged, 0 for subscription access
    pub price_paid: U256,
    /// Whether the purchase was refunded
    pub refunded: bool,
    /// Referrer credited on this purchase, if any
    pub referrer: Option<Address>,
}

impl PurchaseRecord {
    /// A record grants access until it is refunded
    pub fn is_live(&self) -> bool {
        !self.refunded
    }
}

/// A buyer's rating of a course
#[odra::odra_type]
#[derive(Default)]
pub struct Rating {
    /// Score within 1-5
    pub score: u8,
    /// Free-text comment
    pub comment: String,
    /// Block time (ms) of the rating
    pub timestamp: u64,
}

/// Unlimited-access window of an account
#[odra::odra_type]
#[derive(Default)]
pub struct Subscription {
    /// Block time (ms) the window opened
    pub start_time: u64,
    /// Block time (ms) the window closes
    pub end_time: u64,
    /// Whether the subscription was activated
    pub active: bool,
}

impl Subscription {
    /// Active and not yet past its end time
    pub fn is_active_at(&self, now: u64) -> bool {
        self.active && self.end_time > now
    }
}

/// Subscription plans on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPlan {
    /// 30 days of access
    Monthly,
    /// 365 days of access
    Yearly,
}

impl SubscriptionPlan {
    /// Length of the access window in milliseconds
    pub fn duration(&self) -> u64 {
        match self {
            SubscriptionPlan::Monthly => constants::MONTHLY_SUBSCRIPTION_DURATION,
            SubscriptionPlan::Yearly => constants::YEARLY_SUBSCRIPTION_DURATION,
        }
    }
}

/// Constants for validation and defaults
pub mod constants {
    /// One day in milliseconds (block time unit)
    pub const DAY: u64 = 24 * 60 * 60 * 1000;
    /// Monthly subscription window
    pub const MONTHLY_SUBSCRIPTION_DURATION: u64 = 30 * DAY;
    /// Yearly subscription window
    pub const YEARLY_SUBSCRIPTION_DURATION: u64 = 365 * DAY;
    /// Cap on platform fee percent
    pub const MAX_PLATFORM_FEE_PERCENT: u64 = 20;
    /// Cap on referral reward percent
    pub const MAX_REFERRAL_REWARD_PERCENT: u64 = 20;
    /// Cap on bulk discount percent
    pub const MAX_BULK_DISCOUNT_PERCENT: u64 = 100;
    /// Percent denominator
    pub const PERCENT_DENOMINATOR: u64 = 100;
    /// Rating averages are scaled by this factor (two implied decimals)
    pub const RATING_SCALE: u64 = 100;
    /// Lowest valid rating score
    pub const MIN_SCORE: u8 = 1;
    /// Highest valid rating score
    pub const MAX_SCORE: u8 = 5;
    /// Token decimals assumed for default prices
    pub const TOKEN_DECIMALS: u32 = 18;
}
