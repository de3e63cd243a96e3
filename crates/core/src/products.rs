//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Product identity as assigned by the catalog source.
///
/// Identity is the source's integer id, not positional; merging cart lines
/// and catalog lookups both key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a product id from its raw integer value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer value of this id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
///
/// The normalized catalog shape every source converges to. Prices carry
/// their currency; display metadata is carried verbatim from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product unit price
    pub price: Money<'static, Currency>,

    /// Product image URI
    pub image: String,

    /// Product category label
    pub category: String,

    /// Product description
    pub description: String,

    /// Average review rating (0.0 when the source has none)
    pub rating: f64,

    /// Number of reviews (0 when the source has none)
    pub reviews: u32,

    /// Whether the product is currently purchasable
    pub in_stock: bool,
}
