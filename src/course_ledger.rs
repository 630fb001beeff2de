//! Course Ledger - Main Contract Module
//!
//! Settlement ledger of the course marketplace. Every purchase, bulk
//! purchase, subscription, refund and rating goes through this module,
//! which validates eligibility, routes funds through the payment token and
//! records the purchase facts.
//!
//! Each entry point runs to completion or reverts as a whole; a revert
//! rolls back both storage writes and token transfers, so a purchase record
//! never exists without its settlement and vice versa.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;

use crate::access::AccessRegistry;
use crate::catalog::CourseCatalog;
use crate::categories::CategoryRegistry;
use crate::config::PlatformConfig;
use crate::errors::Error;
use crate::events::{
    AdminTransferred, BulkPurchaseCompleted, CategoryCreated, CategoryUpdated, CourseCreated,
    CourseDeactivated, CoursePurchased, CourseRated, CourseUpdated, InstructorCertified,
    InstructorDecertified, PlatformConfigUpdated, ReferralRewardCredited,
    ReferralRewardsWithdrawn, RefundIssued, SubscriptionPurchased,
};
use crate::payment_token::PaymentTokenContractRef;
use crate::ratings::RatingBook;
use crate::settlement::{self, Split};
use crate::subscriptions::SubscriptionLedger;
use crate::types::{Category, Course, PurchaseRecord, Rating, Subscription, SubscriptionPlan};

/// Main ledger contract module
#[odra::module(
    events = [
        CategoryCreated,
        CategoryUpdated,
        InstructorCertified,
        InstructorDecertified,
        CourseCreated,
        CourseUpdated,
        CourseDeactivated,
        CoursePurchased,
        BulkPurchaseCompleted,
        ReferralRewardCredited,
        ReferralRewardsWithdrawn,
        SubscriptionPurchased,
        CourseRated,
        RefundIssued,
        PlatformConfigUpdated,
        AdminTransferred
    ],
    errors = Error
)]
pub struct CourseLedger {
    // ============================================
    // Components
    // ============================================

    /// Admin role and instructor certification
    access: SubModule<AccessRegistry>,
    /// Course categories
    categories: SubModule<CategoryRegistry>,
    /// Course listings
    catalog: SubModule<CourseCatalog>,
    /// Course ratings
    ratings: SubModule<RatingBook>,
    /// Unlimited-access subscriptions
    subscriptions: SubModule<SubscriptionLedger>,

    // ============================================
    // Settlement Storage
    // ============================================

    /// Global platform parameters
    config: Var<PlatformConfig>,
    /// Fungible token used for every payment
    payment_token: Var<Address>,
    /// Purchase facts keyed by (course_id, buyer)
    purchases: Mapping<(u64, Address), PurchaseRecord>,
    /// Count of distinct courses each student has ever bought
    student_course_count: Mapping<Address, u64>,
    /// Indexed courses: (student, index) -> course_id
    student_course_at: Mapping<(Address, u64), u64>,

    // ============================================
    // Referral Storage
    // ============================================

    /// Cumulative referral rewards credited to each referrer
    referral_rewards: Mapping<Address, U256>,
    /// Referral rewards already paid out to each referrer
    referral_withdrawn: Mapping<Address, U256>,
    /// Credited but not yet withdrawn rewards held by the ledger
    referral_liabilities: Var<U256>,
}

#[odra::module]
impl CourseLedger {
    // ============================================
    // Initialization
    // ============================================

    /// Initialize the ledger
    ///
    /// # Arguments
    /// * `admin` - Platform account; holds the admin role and receives platform fees
    /// * `payment_token` - Address of the CEP-18 token used for payments
    ///
    /// Bulk checkout pays instructors and referrers on undiscounted prices.
    /// When the discount exceeds the platform fee (as it does at the default
    /// 5% fee and 10% discount) the difference is drawn from the ledger
    /// reserve, so tokens must be sent to the ledger address before bulk
    /// purchases succeed.
    pub fn init(&mut self, admin: Address, payment_token: Address) {
        self.access.set_admin(&admin);
        self.payment_token.set(payment_token);
        self.config.set(PlatformConfig::default());
        self.referral_liabilities.set(U256::zero());
    }

    // ============================================
    // Category Registry
    // ============================================

    /// Create a category (admin only)
    pub fn create_category(&mut self, name: String) -> u64 {
        self.assert_admin();

        let category = self.categories.create(name);
        self.env().emit_event(CategoryCreated {
            category_id: category.id,
            name: category.name,
            timestamp: self.env().get_block_time(),
        });
        category.id
    }

    /// Rename and enable/disable a category (admin only)
    pub fn update_category(&mut self, category_id: u64, name: String, active: bool) {
        self.assert_admin();

        let category = self.categories.update(category_id, name, active);
        self.env().emit_event(CategoryUpdated {
            category_id,
            name: category.name,
            active: category.active,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Get a category by ID
    pub fn get_category(&self, category_id: u64) -> Option<Category> {
        self.categories.get_category(category_id)
    }

    /// Number of categories ever created
    pub fn get_category_count(&self) -> u64 {
        self.categories.get_category_count()
    }

    /// All categories, active or not
    pub fn get_all_categories(&self) -> Vec<Category> {
        self.categories.get_all_categories()
    }

    // ============================================
    // Instructor Certification
    // ============================================

    /// Certify an instructor (admin only)
    pub fn certify_instructor(&mut self, instructor: Address) {
        self.assert_admin();

        self.access.set_certified(&instructor, true);
        self.env().emit_event(InstructorCertified {
            instructor,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Remove an instructor's certification (admin only)
    pub fn decertify_instructor(&mut self, instructor: Address) {
        self.assert_admin();

        self.access.set_certified(&instructor, false);
        self.env().emit_event(InstructorDecertified {
            instructor,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Whether `account` is a certified instructor
    pub fn is_certified(&self, account: Address) -> bool {
        self.access.is_certified(&account)
    }

    // ============================================
    // Course Catalog
    // ============================================

    /// List a new course; the caller becomes its instructor
    ///
    /// # Arguments
    /// * `title` - Title of the course (non-empty)
    /// * `description` - Long-form description
    /// * `cover_ref` - Cover image URL or IPFS link
    /// * `price` - Price in token units (non-zero)
    /// * `category_id` - Category, or 0 for none
    pub fn create_course(
        &mut self,
        title: String,
        description: String,
        cover_ref: String,
        price: U256,
        category_id: u64,
    ) -> u64 {
        let caller = self.env().caller();

        if self.current_config().require_certification && !self.access.is_certified(&caller) {
            self.env().revert(Error::NotCertified);
        }
        self.categories.require_assignable(category_id);

        let course = self.catalog.create(caller, title, description, cover_ref, price, category_id);
        self.env().emit_event(CourseCreated {
            course_id: course.id,
            instructor: caller,
            title: course.title,
            price: course.price,
            category_id,
            timestamp: course.created_at,
        });
        course.id
    }

    /// Edit a course listing (instructor only)
    pub fn update_course(
        &mut self,
        course_id: u64,
        title: String,
        description: String,
        cover_ref: String,
        price: U256,
        category_id: u64,
    ) {
        let caller = self.env().caller();

        let previous_category = self.catalog.course_or_revert(course_id).category_id;
        let course = self.catalog.update(caller, course_id, title, description, cover_ref, price, category_id);
        // A disabled category only blocks moving courses into it
        if category_id != previous_category {
            self.categories.require_assignable(category_id);
        }

        self.env().emit_event(CourseUpdated {
            course_id,
            title: course.title,
            price: course.price,
            category_id,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Hide a course from new purchases (instructor or admin)
    ///
    /// Buyers who already purchased keep access.
    pub fn deactivate_course(&mut self, course_id: u64) {
        let caller = self.env().caller();

        let course = self.catalog.course_or_revert(course_id);
        if course.instructor != caller && !self.access.is_admin(&caller) {
            self.env().revert(Error::NotInstructor);
        }

        self.catalog.deactivate(course_id);
        self.env().emit_event(CourseDeactivated {
            course_id,
            deactivated_by: caller,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Get a course by ID
    pub fn get_course(&self, course_id: u64) -> Option<Course> {
        self.catalog.get_course(course_id)
    }

    /// Number of courses ever created
    pub fn get_course_count(&self) -> u64 {
        self.catalog.get_course_count()
    }

    /// Page through active courses
    pub fn get_active_courses(&self, offset: u64, limit: u64) -> Vec<Course> {
        self.catalog.get_active_courses(offset, limit)
    }

    /// Active courses filed under a category
    pub fn get_courses_by_category(&self, category_id: u64) -> Vec<Course> {
        self.catalog.get_courses_by_category(category_id)
    }

    /// IDs of courses created by `instructor`
    pub fn get_instructor_courses(&self, instructor: Address) -> Vec<u64> {
        self.catalog.get_instructor_courses(instructor)
    }

    // ============================================
    // Purchase & Settlement
    // ============================================

    /// Purchase a single course
    ///
    /// # Arguments
    /// * `course_id` - ID of the course to purchase
    /// * `referrer` - Account that referred the buyer, if any
    pub fn purchase_course(&mut self, course_id: u64, referrer: Option<Address>) {
        let caller = self.env().caller();
        let course = self.purchasable_course(course_id, &caller);

        if self.subscriptions.has_active_subscription(caller) {
            self.record_purchase(&course, caller, U256::zero(), None);
            self.emit_purchase(&course, caller, U256::zero(), &Split::default(), None, true);
            return;
        }

        let config = self.current_config();
        let referrer = eligible_referrer(referrer, &caller);
        let split = self.ok_or_revert(settlement::split_purchase(course.price, &config, referrer.is_some()));

        let mut token = self.token();
        let ledger = self.env().self_address();
        let admin = self.admin();
        self.require_payable(&token, &caller, course.price);

        // Effects
        self.record_purchase(&course, caller, course.price, referrer);
        if let Some(referrer) = referrer {
            self.credit_referral(referrer, caller, course_id, split.referral_reward);
        }

        // Interactions
        pull(&mut token, &caller, &admin, split.platform_fee);
        pull(&mut token, &caller, &course.instructor, split.instructor_payment);
        pull(&mut token, &caller, &ledger, split.referral_reward);

        self.emit_purchase(&course, caller, course.price, &split, referrer, false);
    }

    /// Purchase several courses at once with the bulk discount
    ///
    /// The discount applies once to the summed price. Instructors and the
    /// referrer are paid on each course's full price; the platform absorbs
    /// the discount, drawing on the ledger reserve when its share runs short.
    /// Every course must be purchasable or the whole batch fails.
    ///
    /// # Arguments
    /// * `course_ids` - Courses to purchase, at least the bulk threshold
    /// * `referrer` - Account that referred the buyer, if any
    pub fn purchase_courses_bulk(&mut self, course_ids: Vec<u64>, referrer: Option<Address>) {
        let caller = self.env().caller();
        let config = self.current_config();

        if (course_ids.len() as u64) < config.bulk_discount_threshold {
            self.env().revert(Error::NotEnoughCoursesForBulk);
        }
        for (i, course_id) in course_ids.iter().enumerate() {
            if course_ids[..i].contains(course_id) {
                self.env().revert(Error::DuplicateCourse);
            }
        }

        let mut courses = Vec::with_capacity(course_ids.len());
        for course_id in course_ids.iter() {
            courses.push(self.purchasable_course(*course_id, &caller));
        }

        if self.subscriptions.has_active_subscription(caller) {
            for course in courses.iter() {
                self.record_purchase(course, caller, U256::zero(), None);
                self.emit_purchase(course, caller, U256::zero(), &Split::default(), None, true);
            }
            self.env().emit_event(BulkPurchaseCompleted {
                buyer: caller,
                course_ids,
                subtotal: U256::zero(),
                total_charged: U256::zero(),
                reserve_draw: U256::zero(),
                timestamp: self.env().get_block_time(),
            });
            return;
        }

        let referrer = eligible_referrer(referrer, &caller);
        let prices: Vec<U256> = courses.iter().map(|course| course.price).collect();
        let bulk = self.ok_or_revert(settlement::settle_bulk(&prices, &config, referrer.is_some()));

        let mut token = self.token();
        let ledger = self.env().self_address();
        let admin = self.admin();
        self.require_payable(&token, &caller, bulk.total_charged);
        if self.reserve_of(&token) < bulk.reserve_draw {
            self.env().revert(Error::InsufficientReserve);
        }

        // Effects
        let mut subtotal = U256::zero();
        for (i, course) in courses.iter().enumerate() {
            subtotal += course.price;
            self.record_purchase(course, caller, bulk.price_shares[i], referrer);
            if let Some(referrer) = referrer {
                self.credit_referral(referrer, caller, course.id, bulk.splits[i].referral_reward);
            }
        }

        // Interactions
        pull(&mut token, &caller, &ledger, bulk.total_charged);
        for (i, course) in courses.iter().enumerate() {
            pay(&mut token, &course.instructor, bulk.splits[i].instructor_payment);
        }
        pay(&mut token, &admin, bulk.platform_payout);

        for (i, course) in courses.iter().enumerate() {
            self.emit_purchase(course, caller, bulk.price_shares[i], &bulk.splits[i], referrer, false);
        }
        self.env().emit_event(BulkPurchaseCompleted {
            buyer: caller,
            course_ids,
            subtotal,
            total_charged: bulk.total_charged,
            reserve_draw: bulk.reserve_draw,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Whether `account` holds a non-refunded purchase of `course_id`
    pub fn has_purchased(&self, course_id: u64, account: Address) -> bool {
        self.live_purchase(course_id, account).is_some()
    }

    /// Get the purchase record of `(course_id, account)`, refunded or not
    pub fn get_purchase_record(&self, course_id: u64, account: Address) -> Option<PurchaseRecord> {
        self.purchases.get(&(course_id, account))
    }

    /// IDs of courses `student` currently holds
    pub fn get_student_courses(&self, student: Address) -> Vec<u64> {
        let count = self.student_course_count.get_or_default(&student);
        let mut result = Vec::new();

        for i in 0..count {
            if let Some(course_id) = self.student_course_at.get(&(student, i)) {
                if self.has_purchased(course_id, student) {
                    result.push(course_id);
                }
            }
        }

        result
    }

    // ============================================
    // Subscriptions
    // ============================================

    /// Buy 30 days of unlimited access
    pub fn purchase_monthly_subscription(&mut self) {
        self.purchase_subscription(SubscriptionPlan::Monthly);
    }

    /// Buy 365 days of unlimited access
    pub fn purchase_yearly_subscription(&mut self) {
        self.purchase_subscription(SubscriptionPlan::Yearly);
    }

    /// Whether `account` has an unexpired subscription
    pub fn has_active_subscription(&self, account: Address) -> bool {
        self.subscriptions.has_active_subscription(account)
    }

    /// Get the latest subscription of `account`
    pub fn get_subscription(&self, account: Address) -> Option<Subscription> {
        self.subscriptions.get_subscription(account)
    }

    // ============================================
    // Ratings
    // ============================================

    /// Rate a purchased course once
    ///
    /// # Arguments
    /// * `course_id` - ID of the course
    /// * `score` - Score within 1-5
    /// * `comment` - Free-text comment
    pub fn rate_course(&mut self, course_id: u64, score: u8, comment: String) {
        let caller = self.env().caller();

        if !self.has_purchased(course_id, caller) {
            self.env().revert(Error::MustPurchaseToRate);
        }

        let rating = self.ratings.record(course_id, caller, score, comment);
        self.catalog.record_rating(course_id, score);

        self.env().emit_event(CourseRated {
            course_id,
            rater: caller,
            score,
            timestamp: rating.timestamp,
        });
    }

    /// Get the rating `account` left on `course_id`
    pub fn get_user_rating(&self, course_id: u64, account: Address) -> Option<Rating> {
        self.ratings.get_rating(course_id, account)
    }

    /// Average score scaled by 100 (truncated) and the number of ratings;
    /// `(0, 0)` for unrated or unknown courses
    pub fn get_course_average_rating(&self, course_id: u64) -> (u64, u64) {
        self.catalog.get_course(course_id).map_or((0, 0), |course| {
            (
                settlement::scaled_average(course.total_rating_sum, course.rating_count),
                course.rating_count,
            )
        })
    }

    // ============================================
    // Refunds
    // ============================================

    /// Refund a paid purchase within the refund window
    ///
    /// The platform fee is kept; the instructor returns the rest, so the
    /// instructor must have approved the ledger for at least that amount.
    /// Referral rewards already credited stay with the referrer.
    pub fn request_refund(&mut self, course_id: u64) {
        let caller = self.env().caller();
        let now = self.env().get_block_time();
        let config = self.current_config();

        let mut record = self.live_purchase(course_id, caller)
            .unwrap_or_else(|| self.env().revert(Error::NotPurchased));
        if record.price_paid.is_zero() {
            self.env().revert(Error::NothingToRefund);
        }
        if now > record.purchase_time.saturating_add(config.refund_period) {
            self.env().revert(Error::RefundPeriodExpired);
        }

        let course = self.catalog.course_or_revert(course_id);
        let amount = self.ok_or_revert(settlement::refund_amount(record.price_paid, &config));

        let mut token = self.token();
        self.require_payable(&token, &course.instructor, amount);

        // Effects
        record.refunded = true;
        self.purchases.set(&(course_id, caller), record);

        // Interactions
        pull(&mut token, &course.instructor, &caller, amount);

        self.env().emit_event(RefundIssued {
            course_id,
            buyer: caller,
            instructor: course.instructor,
            amount,
            timestamp: now,
        });
    }

    // ============================================
    // Referral Rewards
    // ============================================

    /// Withdraw all credited, unwithdrawn referral rewards
    pub fn withdraw_referral_rewards(&mut self) {
        let caller = self.env().caller();

        let claimable = self.get_claimable_referral_rewards(caller);
        if claimable.is_zero() {
            self.env().revert(Error::NoReferralRewards);
        }

        // Update balances before transfer (CEI pattern)
        let withdrawn = self.referral_withdrawn.get_or_default(&caller) + claimable;
        self.referral_withdrawn.set(&caller, withdrawn);
        let liabilities = self.referral_liabilities.get_or_default() - claimable;
        self.referral_liabilities.set(liabilities);

        let mut token = self.token();
        pay(&mut token, &caller, claimable);

        self.env().emit_event(ReferralRewardsWithdrawn {
            referrer: caller,
            amount: claimable,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Total referral rewards ever credited to `referrer`
    pub fn get_referral_rewards(&self, referrer: Address) -> U256 {
        self.referral_rewards.get_or_default(&referrer)
    }

    /// Referral rewards `referrer` can withdraw now
    pub fn get_claimable_referral_rewards(&self, referrer: Address) -> U256 {
        self.referral_rewards.get_or_default(&referrer) - self.referral_withdrawn.get_or_default(&referrer)
    }

    /// Tokens held by the ledger beyond its outstanding referral liabilities
    pub fn get_reserve_balance(&self) -> U256 {
        let token = self.token();
        self.reserve_of(&token)
    }

    // ============================================
    // Platform Configuration
    // ============================================

    /// Set the platform fee percent, 0-20 (admin only)
    pub fn set_platform_fee(&mut self, percent: u64) {
        self.assert_admin();
        let candidate = self.current_config().with_platform_fee(percent);
        self.store_config(candidate);
    }

    /// Set the referral reward percent, 0-20 (admin only)
    pub fn set_referral_reward_percent(&mut self, percent: u64) {
        self.assert_admin();
        let candidate = self.current_config().with_referral_reward(percent);
        self.store_config(candidate);
    }

    /// Set the refund window in milliseconds (admin only)
    pub fn set_refund_period(&mut self, period: u64) {
        self.assert_admin();
        let candidate = self.current_config().with_refund_period(period);
        self.store_config(candidate);
    }

    /// Set both subscription prices (admin only)
    pub fn set_subscription_prices(&mut self, monthly: U256, yearly: U256) {
        self.assert_admin();
        let candidate = self.current_config().with_subscription_prices(monthly, yearly);
        self.store_config(candidate);
    }

    /// Set the bulk discount threshold and percent (admin only)
    pub fn set_bulk_discount_settings(&mut self, threshold: u64, percent: u64) {
        self.assert_admin();
        let candidate = self.current_config().with_bulk_discount(threshold, percent);
        self.store_config(candidate);
    }

    /// Switch the certification gate on course creation (admin only)
    pub fn set_require_certification(&mut self, required: bool) {
        self.assert_admin();
        let candidate = self.current_config().with_require_certification(required);
        self.store_config(candidate);
    }

    /// Get the current platform configuration
    pub fn get_config(&self) -> PlatformConfig {
        self.current_config()
    }

    // ============================================
    // Admin
    // ============================================

    /// Hand the admin role to another account (admin only)
    pub fn transfer_admin(&mut self, new_admin: Address) {
        let previous_admin = self.assert_admin();

        self.access.set_admin(&new_admin);
        self.env().emit_event(AdminTransferred {
            previous_admin,
            new_admin,
            timestamp: self.env().get_block_time(),
        });
    }

    /// Get the admin address
    pub fn get_admin(&self) -> Option<Address> {
        self.access.get_admin()
    }

    /// Get the payment token address
    pub fn get_payment_token(&self) -> Option<Address> {
        self.payment_token.get()
    }
}

// ============================================
// Internal Functions
// ============================================

impl CourseLedger {
    /// Revert unless the caller is the admin; returns the caller
    fn assert_admin(&self) -> Address {
        let caller = self.env().caller();
        if !self.access.is_admin(&caller) {
            self.env().revert(Error::Unauthorized);
        }
        caller
    }

    fn admin(&self) -> Address {
        self.access.get_admin()
            .unwrap_or_else(|| self.env().revert(Error::AdminNotSet))
    }

    fn current_config(&self) -> PlatformConfig {
        self.config.get().unwrap_or_default()
    }

    fn store_config(&mut self, candidate: PlatformConfig) {
        self.ok_or_revert(candidate.validate());
        self.config.set(candidate.clone());

        self.env().emit_event(PlatformConfigUpdated {
            platform_fee_percent: candidate.platform_fee_percent,
            referral_reward_percent: candidate.referral_reward_percent,
            refund_period: candidate.refund_period,
            monthly_subscription_price: candidate.monthly_subscription_price,
            yearly_subscription_price: candidate.yearly_subscription_price,
            bulk_discount_threshold: candidate.bulk_discount_threshold,
            bulk_discount_percent: candidate.bulk_discount_percent,
            require_certification: candidate.require_certification,
            timestamp: self.env().get_block_time(),
        });
    }

    fn ok_or_revert<T>(&self, result: Result<T, Error>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn token(&self) -> PaymentTokenContractRef {
        let address = self.payment_token.get()
            .unwrap_or_else(|| self.env().revert(Error::PaymentTokenNotSet));
        PaymentTokenContractRef::new(self.env(), address)
    }

    /// Revert unless `payer` can cover `amount` and has approved the ledger for it
    fn require_payable(&self, token: &PaymentTokenContractRef, payer: &Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        if token.balance_of(payer) < amount {
            self.env().revert(Error::InsufficientFunds);
        }
        let ledger = self.env().self_address();
        if token.allowance(payer, &ledger) < amount {
            self.env().revert(Error::InsufficientAllowance);
        }
    }

    fn reserve_of(&self, token: &PaymentTokenContractRef) -> U256 {
        let held = token.balance_of(&self.env().self_address());
        held.saturating_sub(self.referral_liabilities.get_or_default())
    }

    /// Steps shared by single and bulk purchase: the course exists and is
    /// active, the caller holds no live purchase, and is not its instructor
    fn purchasable_course(&self, course_id: u64, buyer: &Address) -> Course {
        let course = self.catalog.get_course(course_id)
            .unwrap_or_else(|| self.env().revert(Error::CourseNotFound));
        if !course.active {
            self.env().revert(Error::CourseInactive);
        }
        if self.live_purchase(course_id, *buyer).is_some() {
            self.env().revert(Error::AlreadyPurchased);
        }
        if course.instructor == *buyer {
            self.env().revert(Error::CannotPurchaseOwnCourse);
        }
        course
    }

    fn live_purchase(&self, course_id: u64, account: Address) -> Option<PurchaseRecord> {
        self.purchases
            .get(&(course_id, account))
            .filter(PurchaseRecord::is_live)
    }

    fn record_purchase(
        &mut self,
        course: &Course,
        buyer: Address,
        price_paid: U256,
        referrer: Option<Address>,
    ) {
        let key = (course.id, buyer);
        if self.purchases.get(&key).is_none() {
            let index = self.student_course_count.get_or_default(&buyer);
            self.student_course_at.set(&(buyer, index), course.id);
            self.student_course_count.set(&buyer, index + 1);
        }

        let record = PurchaseRecord {
            course_id: course.id,
            buyer,
            purchase_time: self.env().get_block_time(),
            price_paid,
            refunded: false,
            referrer,
        };
        self.purchases.set(&key, record);
        self.catalog.record_student(course.id);
    }

    fn credit_referral(&mut self, referrer: Address, buyer: Address, course_id: u64, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let earned = self.referral_rewards.get_or_default(&referrer) + amount;
        self.referral_rewards.set(&referrer, earned);
        let liabilities = self.referral_liabilities.get_or_default() + amount;
        self.referral_liabilities.set(liabilities);

        self.env().emit_event(ReferralRewardCredited {
            referrer,
            buyer,
            course_id,
            amount,
            timestamp: self.env().get_block_time(),
        });
    }

    fn purchase_subscription(&mut self, plan: SubscriptionPlan) {
        let caller = self.env().caller();
        let config = self.current_config();
        let price = match plan {
            SubscriptionPlan::Monthly => config.monthly_subscription_price,
            SubscriptionPlan::Yearly => config.yearly_subscription_price,
        };

        let mut token = self.token();
        let admin = self.admin();
        self.require_payable(&token, &caller, price);

        let subscription = self.subscriptions.activate(caller, plan.duration());
        pull(&mut token, &caller, &admin, price);

        self.env().emit_event(SubscriptionPurchased {
            subscriber: caller,
            price,
            start_time: subscription.start_time,
            end_time: subscription.end_time,
        });
    }

    fn emit_purchase(
        &self,
        course: &Course,
        buyer: Address,
        price_paid: U256,
        split: &Split,
        referrer: Option<Address>,
        via_subscription: bool,
    ) {
        self.env().emit_event(CoursePurchased {
            course_id: course.id,
            buyer,
            instructor: course.instructor,
            price_paid,
            platform_fee: split.platform_fee,
            referral_reward: split.referral_reward,
            instructor_payment: split.instructor_payment,
            referrer,
            via_subscription,
            timestamp: self.env().get_block_time(),
        });
    }
}

/// A referrer only counts when present and different from the buyer
fn eligible_referrer(referrer: Option<Address>, buyer: &Address) -> Option<Address> {
    referrer.filter(|referrer| referrer != buyer)
}

/// Move `amount` from `owner` to `recipient` on the ledger's allowance
fn pull(token: &mut PaymentTokenContractRef, owner: &Address, recipient: &Address, amount: U256) {
    if !amount.is_zero() {
        token.transfer_from(owner, recipient, &amount);
    }
}

/// Move `amount` out of ledger custody to `recipient`
fn pay(token: &mut PaymentTokenContractRef, recipient: &Address, amount: U256) {
    if !amount.is_zero() {
        token.transfer(recipient, &amount);
    }
}
