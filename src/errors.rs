//! Error definitions for the Course Ledger

use odra::prelude::*;

/// Custom errors for the Course Ledger contract
#[odra::odra_error]
#[derive(Debug)]
pub enum Error {
    // ============================================
    // Access Errors (1-9)
    // ============================================

    /// Caller does not hold the admin role
    Unauthorized = 1,
    /// Admin address has not been set
    AdminNotSet = 2,
    /// Payment token address has not been set
    PaymentTokenNotSet = 3,

    // ============================================
    // Category Errors (10-19)
    // ============================================

    /// Category name cannot be empty
    EmptyCategoryName = 10,
    /// Category with given ID was not found
    CategoryNotFound = 11,
    /// Category exists but is disabled
    CategoryInactive = 12,

    // ============================================
    // Course Errors (20-39)
    // ============================================

    /// Course title cannot be empty
    EmptyTitle = 20,
    /// Price must be greater than 0
    InvalidPrice = 21,
    /// Caller is not a certified instructor
    NotCertified = 22,
    /// Course with given ID was not found
    CourseNotFound = 23,
    /// Course is not active
    CourseInactive = 24,
    /// Caller is not the instructor of this course
    NotInstructor = 25,

    // ============================================
    // Purchase Errors (40-59)
    // ============================================

    /// Caller already holds a non-refunded purchase of this course
    AlreadyPurchased = 40,
    /// Instructors cannot buy their own course
    CannotPurchaseOwnCourse = 41,
    /// Not enough courses in the batch for the bulk discount
    NotEnoughCoursesForBulk = 42,
    /// The same course appears twice in one batch
    DuplicateCourse = 43,
    /// Payer balance is below the amount to move
    InsufficientFunds = 44,
    /// Payer has not approved the ledger for the amount to move
    InsufficientAllowance = 45,
    /// Ledger reserve cannot cover the discount of a bulk purchase
    InsufficientReserve = 46,
    /// Settlement arithmetic overflowed
    ArithmeticOverflow = 47,

    // ============================================
    // Refund Errors (60-69)
    // ============================================

    /// No non-refunded purchase exists for this course
    NotPurchased = 60,
    /// Refund window has passed
    RefundPeriodExpired = 61,
    /// Purchase was free and has nothing to return
    NothingToRefund = 62,

    // ============================================
    // Rating Errors (70-79)
    // ============================================

    /// Score must be within 1-5
    InvalidScore = 70,
    /// Caller must purchase the course before rating it
    MustPurchaseToRate = 71,
    /// Caller has already rated this course
    AlreadyRated = 72,

    // ============================================
    // Configuration Errors (80-89)
    // ============================================

    /// Platform fee cannot exceed 20%
    FeeTooHigh = 80,
    /// Referral reward cannot exceed 20%
    ReferralRewardTooHigh = 81,
    /// Bulk discount cannot exceed 100%
    DiscountTooHigh = 82,
    /// Bulk discount threshold must be at least 1
    InvalidBulkThreshold = 83,
    /// Refund period must be greater than 0
    InvalidRefundPeriod = 84,
    /// Subscription prices must be greater than 0
    InvalidSubscriptionPrice = 85,

    // ============================================
    // Referral Errors (90-99)
    // ============================================

    /// No referral rewards available to withdraw
    NoReferralRewards = 90,
}

/// Coarse failure classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Role mismatch
    Unauthorized,
    /// Business rule violation
    Forbidden,
    /// Unknown id or key
    NotFound,
    /// Duplicate purchase or rating
    Conflict,
    /// Out-of-range or empty input
    InvalidArgument,
    /// Time window passed
    Expired,
    /// Not enough tokens to move
    InsufficientFunds,
    /// Not enough approved tokens to move
    InsufficientAllowance,
    /// Ledger misconfiguration or arithmetic fault
    Internal,
}

impl Error {
    /// Classify this error for rendering.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized => ErrorKind::Unauthorized,
            Error::NotCertified
            | Error::NotInstructor
            | Error::CannotPurchaseOwnCourse
            | Error::MustPurchaseToRate
            | Error::NothingToRefund => ErrorKind::Forbidden,
            Error::CategoryNotFound
            | Error::CourseNotFound
            | Error::CourseInactive
            | Error::NotPurchased
            | Error::NoReferralRewards => ErrorKind::NotFound,
            Error::AlreadyPurchased | Error::AlreadyRated => ErrorKind::Conflict,
            Error::EmptyCategoryName
            | Error::CategoryInactive
            | Error::EmptyTitle
            | Error::InvalidPrice
            | Error::NotEnoughCoursesForBulk
            | Error::DuplicateCourse
            | Error::InvalidScore
            | Error::FeeTooHigh
            | Error::ReferralRewardTooHigh
            | Error::DiscountTooHigh
            | Error::InvalidBulkThreshold
            | Error::InvalidRefundPeriod
            | Error::InvalidSubscriptionPrice => ErrorKind::InvalidArgument,
            Error::RefundPeriodExpired => ErrorKind::Expired,
            Error::InsufficientFunds | Error::InsufficientReserve => ErrorKind::InsufficientFunds,
            Error::InsufficientAllowance => ErrorKind::InsufficientAllowance,
            Error::AdminNotSet | Error::PaymentTokenNotSet | Error::ArithmeticOverflow => {
                ErrorKind::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_follow_failure_classes() {
        assert_eq!(Error::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::CannotPurchaseOwnCourse.kind(), ErrorKind::Forbidden);
        assert_eq!(Error::MustPurchaseToRate.kind(), ErrorKind::Forbidden);
        assert_eq!(Error::CourseNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(Error::AlreadyPurchased.kind(), ErrorKind::Conflict);
        assert_eq!(Error::AlreadyRated.kind(), ErrorKind::Conflict);
        assert_eq!(Error::InvalidScore.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::RefundPeriodExpired.kind(), ErrorKind::Expired);
        assert_eq!(Error::InsufficientReserve.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(Error::InsufficientAllowance.kind(), ErrorKind::InsufficientAllowance);
    }
}
