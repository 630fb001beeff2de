//! Course Ledger - Course Marketplace Settlement on Casper Network
//!
//! This contract keeps the books of a course marketplace:
//! - Instructors list courses, optionally gated by certification
//! - Students purchase courses singly or in discounted bulk checkouts
//! - Subscribers get unlimited access for the length of their window
//! - Referrers earn a cut of referred purchases and withdraw it later
//! - Buyers rate purchased courses and may request refunds within a window
//!
//! Built with Odra framework for Casper Network.

#![cfg_attr(target_arch = "wasm32", no_std)]
#![cfg_attr(target_arch = "wasm32", no_main)]

extern crate alloc;

pub mod access;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod course_ledger;
pub mod errors;
pub mod events;
pub mod payment_token;
pub mod ratings;
pub mod settlement;
pub mod subscriptions;
pub mod types;

pub use course_ledger::CourseLedger;
