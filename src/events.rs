//! Event definitions for the Course Ledger
//!
//! Events are emitted for every state change and can be
//! indexed by off-chain services.

use odra::prelude::*;
use odra::casper_types::U256;

// ============================================
// Catalog Events
// ============================================

/// Emitted when a category is created
#[odra::event]
pub struct CategoryCreated {
    /// Unique identifier of the category
    pub category_id: u64,
    /// Display name
    pub name: String,
    /// Timestamp of creation
    pub timestamp: u64,
}

/// Emitted when a category is renamed or toggled
#[odra::event]
pub struct CategoryUpdated {
    /// Unique identifier of the category
    pub category_id: u64,
    /// New display name
    pub name: String,
    /// New active flag
    pub active: bool,
    /// Timestamp of the update
    pub timestamp: u64,
}

/// Emitted when an instructor is certified
#[odra::event]
pub struct InstructorCertified {
    /// Address of the instructor
    pub instructor: Address,
    /// Timestamp of the change
    pub timestamp: u64,
}

/// Emitted when an instructor loses certification
#[odra::event]
pub struct InstructorDecertified {
    /// Address of the instructor
    pub instructor: Address,
    /// Timestamp of the change
    pub timestamp: u64,
}

/// Emitted when a new course is listed
#[odra::event]
pub struct CourseCreated {
    /// Unique identifier of the course
    pub course_id: u64,
    /// Address of the instructor
    pub instructor: Address,
    /// Title of the course
    pub title: String,
    /// Price in token units
    pub price: U256,
    /// Category id, 0 when uncategorized
    pub category_id: u64,
    /// Timestamp when the course was created
    pub timestamp: u64,
}

/// Emitted when a course listing is edited
#[odra::event]
pub struct CourseUpdated {
    /// Unique identifier of the course
    pub course_id: u64,
    /// New title
    pub title: String,
    /// New price
    pub price: U256,
    /// New category id
    pub category_id: u64,
    /// Timestamp of the update
    pub timestamp: u64,
}

/// Emitted when a course is hidden from new purchases
#[odra::event]
pub struct CourseDeactivated {
    /// Unique identifier of the course
    pub course_id: u64,
    /// Address that deactivated it (instructor or admin)
    pub deactivated_by: Address,
    /// Timestamp when the course was deactivated
    pub timestamp: u64,
}

// ============================================
// Settlement Events
// ============================================

/// Emitted for every recorded purchase
#[odra::event]
pub struct CoursePurchased {
    /// Unique identifier of the course
    pub course_id: u64,
    /// Address of the buyer
    pub buyer: Address,
    /// Address of the instructor
    pub instructor: Address,
    /// Amount recorded as paid
    pub price_paid: U256,
    /// Platform fee routed
    pub platform_fee: U256,
    /// Referral reward credited
    pub referral_reward: U256,
    /// Amount paid to the instructor
    pub instructor_payment: U256,
    /// Referrer credited, if any
    pub referrer: Option<Address>,
    /// Whether the purchase went through the subscription free path
    pub via_subscription: bool,
    /// Timestamp of the purchase
    pub timestamp: u64,
}

/// Emitted once per bulk checkout, after the per-course events
#[odra::event]
pub struct BulkPurchaseCompleted {
    /// Address of the buyer
    pub buyer: Address,
    /// Courses purchased, in request order
    pub course_ids: Vec<u64>,
    /// Sum of undiscounted prices
    pub subtotal: U256,
    /// Amount charged after the discount
    pub total_charged: U256,
    /// Amount the ledger reserve added to cover the discount
    pub reserve_draw: U256,
    /// Timestamp of the purchase
    pub timestamp: u64,
}

/// Emitted when a referrer is credited
#[odra::event]
pub struct ReferralRewardCredited {
    /// Address of the referrer
    pub referrer: Address,
    /// Address of the referred buyer
    pub buyer: Address,
    /// Course that was purchased
    pub course_id: u64,
    /// Amount credited
    pub amount: U256,
    /// Timestamp of the credit
    pub timestamp: u64,
}

/// Emitted when a referrer withdraws credited rewards
#[odra::event]
pub struct ReferralRewardsWithdrawn {
    /// Address of the referrer
    pub referrer: Address,
    /// Amount withdrawn
    pub amount: U256,
    /// Timestamp of the withdrawal
    pub timestamp: u64,
}

/// Emitted when a subscription is bought
#[odra::event]
pub struct SubscriptionPurchased {
    /// Address of the subscriber
    pub subscriber: Address,
    /// Price charged
    pub price: U256,
    /// Window start
    pub start_time: u64,
    /// Window end
    pub end_time: u64,
}

/// Emitted when a course is rated
#[odra::event]
pub struct CourseRated {
    /// Unique identifier of the course
    pub course_id: u64,
    /// Address of the rater
    pub rater: Address,
    /// Score within 1-5
    pub score: u8,
    /// Timestamp of the rating
    pub timestamp: u64,
}

/// Emitted when a purchase is refunded
#[odra::event]
pub struct RefundIssued {
    /// Unique identifier of the course
    pub course_id: u64,
    /// Address of the refunded buyer
    pub buyer: Address,
    /// Address of the instructor who paid the refund
    pub instructor: Address,
    /// Amount returned to the buyer
    pub amount: U256,
    /// Timestamp of the refund
    pub timestamp: u64,
}

// ============================================
// Admin Events
// ============================================

/// Emitted after any configuration setter succeeds
#[odra::event]
pub struct PlatformConfigUpdated {
    /// Platform fee percent
    pub platform_fee_percent: u64,
    /// Referral reward percent
    pub referral_reward_percent: u64,
    /// Refund window in ms
    pub refund_period: u64,
    /// Monthly subscription price
    pub monthly_subscription_price: U256,
    /// Yearly subscription price
    pub yearly_subscription_price: U256,
    /// Bulk discount threshold
    pub bulk_discount_threshold: u64,
    /// Bulk discount percent
    pub bulk_discount_percent: u64,
    /// Whether certification gates course creation
    pub require_certification: bool,
    /// Timestamp of the update
    pub timestamp: u64,
}

/// Emitted when the admin role moves to a new address
#[odra::event]
pub struct AdminTransferred {
    /// Previous admin
    pub previous_admin: Address,
    /// New admin
    pub new_admin: Address,
    /// Timestamp of the transfer
    pub timestamp: u64,
}
