//! Barrow
//!
//! Barrow is a storefront engine built around a reducer-style shopping cart:
//! every dispatched action produces a fresh immutable snapshot whose totals
//! are derived from its line items, never mutated in place.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod store;
pub mod utils;
