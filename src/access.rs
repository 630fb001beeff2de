//! Role lookup for the Course Ledger
//!
//! Holds the admin role and the instructor certification flags. The ledger
//! asks this module who may do what instead of comparing addresses inline.

use odra::prelude::*;

/// Admin role and instructor certification registry
#[odra::module]
pub struct AccessRegistry {
    /// Admin address (platform account)
    admin: Var<Address>,
    /// Certified instructors
    certified_instructors: Mapping<Address, bool>,
}

#[odra::module]
impl AccessRegistry {
    /// Get the admin address
    pub fn get_admin(&self) -> Option<Address> {
        self.admin.get()
    }

    /// Whether `account` holds the admin role
    pub fn is_admin(&self, account: &Address) -> bool {
        self.admin.get().map_or(false, |admin| admin == *account)
    }

    /// Whether `account` is a certified instructor
    pub fn is_certified(&self, account: &Address) -> bool {
        self.certified_instructors.get_or_default(account)
    }

    /// Replace the admin address
    pub fn set_admin(&mut self, admin: &Address) {
        self.admin.set(*admin);
    }

    /// Set or clear the certification flag; idempotent
    pub fn set_certified(&mut self, account: &Address, certified: bool) {
        self.certified_instructors.set(account, certified);
    }
}
