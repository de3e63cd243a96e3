//! Barrow prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartAction, CartError, CartState, LineItem},
    catalog::{Catalog, CatalogError, RawProduct, normalize},
    fixtures::{Fixture, FixtureError},
    pricing::{CheckoutPolicy, OrderSummary, SummaryError},
    products::{Product, ProductId},
    receipt::{CartReceipt, ReceiptError},
    store::{CartStore, SubscriptionKey},
};
