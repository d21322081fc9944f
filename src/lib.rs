//! # QKart Core
//!
//! Storefront logic that does not depend on the network, the browser or any stored session.
//!
//! ## Flow
//!
//! - Catalog snapshot + sparse cart go into [`cart::materialize`]
//! - Priced line items go into [`cart::total_value`] or [`cart::OrderSummary`]
//! - Keystrokes go into a [`debounce::Debouncer`], which fires one catalog search per quiet period
//! - Every search is tagged by a [`sequence::Sequencer`] so a slow, stale response never
//!   overwrites a newer one
//!
//! ## Notes
//!
//! - A cart entry whose product is missing from the snapshot is dropped, not priced at zero
//! - The store owns quantities, we only propose `current + 1` or `current - 1`
//! - Login/registration forms are checked by [`validation`] before any request is made

pub mod cart;
pub mod catalog;
pub mod debounce;
pub mod notify;
pub mod sequence;
pub mod validation;

pub use cart::{
    Adjustment, LineItem, OrderSummary, adjusted_quantity, is_in_cart, materialize, total_value,
};
pub use catalog::{CartEntry, CatalogItem, MAX_RATING};
pub use debounce::{Debouncer, Timer, TimerHandle, TokioTimer};
pub use notify::{Notify, Severity};
pub use sequence::Sequencer;
pub use validation::{Credentials, Registration, ValidationError};
