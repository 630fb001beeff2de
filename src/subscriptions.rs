//! Subscription ledger
//!
//! Time-boxed unlimited access. A new purchase overwrites the previous
//! window; there is no stacking and no proration.

use odra::prelude::*;

use crate::types::Subscription;

/// Unlimited-access windows per account
#[odra::module]
pub struct SubscriptionLedger {
    /// Latest subscription of each account
    subscriptions: Mapping<Address, Subscription>,
}

#[odra::module]
impl SubscriptionLedger {
    /// Open a window of `duration` ms starting now, replacing any previous one
    pub fn activate(&mut self, account: Address, duration: u64) -> Subscription {
        let now = self.env().get_block_time();
        let subscription = Subscription {
            start_time: now,
            end_time: now.saturating_add(duration),
            active: true,
        };
        self.subscriptions.set(&account, subscription.clone());
        subscription
    }

    /// Whether `account` has an unexpired subscription
    pub fn has_active_subscription(&self, account: Address) -> bool {
        let now = self.env().get_block_time();
        self.subscriptions
            .get(&account)
            .map_or(false, |subscription| subscription.is_active_at(now))
    }

    /// Get the latest subscription of `account`
    pub fn get_subscription(&self, account: Address) -> Option<Subscription> {
        self.subscriptions.get(&account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::constants::DAY;
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn test_window_expires() {
        let env = odra_test::env();
        let mut ledger = SubscriptionLedger::deploy(&env, NoArgs);
        let account = env.get_account(2);

        assert!(!ledger.has_active_subscription(account));

        let subscription = ledger.activate(account, 30 * DAY);
        assert_eq!(subscription.end_time - subscription.start_time, 30 * DAY);
        assert!(ledger.has_active_subscription(account));

        env.advance_block_time(30 * DAY);
        assert!(!ledger.has_active_subscription(account));
    }

    #[test]
    fn test_new_purchase_resets_window() {
        let env = odra_test::env();
        let mut ledger = SubscriptionLedger::deploy(&env, NoArgs);
        let account = env.get_account(2);

        ledger.activate(account, 365 * DAY);
        env.advance_block_time(DAY);
        let replaced = ledger.activate(account, 30 * DAY);

        let stored = ledger.get_subscription(account).expect("Subscription should exist");
        assert_eq!(stored.end_time, replaced.start_time + 30 * DAY);
    }
}
