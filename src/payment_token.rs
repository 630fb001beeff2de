//! Payment token interface
//!
//! The ledger never mints or burns. It only moves tokens it has been
//! approved to move, through the CEP-18 entry points below.

use odra::prelude::*;
use odra::casper_types::U256;

/// Subset of the CEP-18 fungible token the ledger calls
#[odra::external_contract]
pub trait PaymentToken {
    /// Token balance of `address`
    fn balance_of(&self, address: &Address) -> U256;
    /// Amount `spender` may still move on behalf of `owner`
    fn allowance(&self, owner: &Address, spender: &Address) -> U256;
    /// Move `amount` from the calling contract to `recipient`
    fn transfer(&mut self, recipient: &Address, amount: &U256);
    /// Move `amount` from `owner` to `recipient` using the caller's allowance
    fn transfer_from(&mut self, owner: &Address, recipient: &Address, amount: &U256);
}
