//! Catalog

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors raised while validating product descriptors or assembling a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source descriptor carried no id.
    #[error("Product descriptor has no id")]
    MissingId,

    /// The source descriptor carried no name or title.
    #[error("Product {id} has no name")]
    MissingName {
        /// Id of the offending descriptor
        id: ProductId,
    },

    /// The source descriptor carried no price.
    #[error("Product {id} has no price")]
    MissingPrice {
        /// Id of the offending descriptor
        id: ProductId,
    },

    /// The source descriptor carried a negative price.
    #[error("Product {id} has negative price {price}")]
    NegativePrice {
        /// Id of the offending descriptor
        id: ProductId,
        /// The rejected price in major units
        price: Decimal,
    },

    /// The price could not be converted to minor units.
    #[error("Product {id} has unrepresentable price {price}")]
    InvalidPrice {
        /// Id of the offending descriptor
        id: ProductId,
        /// The rejected price in major units
        price: Decimal,
    },

    /// Two products in one catalog share an id.
    #[error("Duplicate product id {id}")]
    DuplicateId {
        /// The id that appeared more than once
        id: ProductId,
    },

    /// A product's currency differs from the catalog currency.
    #[error("Product {id} has currency {product}, but catalog has currency {catalog}")]
    CurrencyMismatch {
        /// Id of the offending product
        id: ProductId,
        /// The product's currency code
        product: &'static str,
        /// The catalog's currency code
        catalog: &'static str,
    },
}

/// Source-shaped product descriptor awaiting validation.
///
/// Each source adapter maps its wire format into this option-typed shape and
/// hands it to [`normalize`]; nothing downstream of the catalog sees a
/// partially-populated product.
#[derive(Debug, Clone, Default)]
pub struct RawProduct {
    /// Source id, when present
    pub id: Option<i64>,

    /// Name or title, when present
    pub name: Option<String>,

    /// Unit price in major currency units, when present
    pub price: Option<Decimal>,

    /// Image URI
    pub image: Option<String>,

    /// Category label
    pub category: Option<String>,

    /// Long-form description
    pub description: Option<String>,

    /// Average review rating
    pub rating: Option<f64>,

    /// Number of reviews
    pub reviews: Option<u32>,

    /// Stock availability flag
    pub in_stock: Option<bool>,
}

/// Validate a raw descriptor and produce the normalized [`Product`].
///
/// Requires an id, a name, and a non-negative price; everything else falls
/// back to a neutral default (empty strings, rating 0, no reviews, in stock).
///
/// # Errors
///
/// Returns a [`CatalogError`] if the id, name or price is missing, or if the
/// price is negative or cannot be represented in minor units.
pub fn normalize(
    raw: RawProduct,
    currency: &'static Currency,
) -> Result<Product, CatalogError> {
    let id = ProductId::new(raw.id.ok_or(CatalogError::MissingId)?);
    let name = raw.name.ok_or(CatalogError::MissingName { id })?;
    let price = raw.price.ok_or(CatalogError::MissingPrice { id })?;

    if price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice { id, price });
    }

    let minor_units = price
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(CatalogError::InvalidPrice { id, price })?;

    Ok(Product {
        id,
        name,
        price: Money::from_minor(minor_units, currency),
        image: raw.image.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        rating: raw.rating.unwrap_or_default(),
        reviews: raw.reviews.unwrap_or_default(),
        in_stock: raw.in_stock.unwrap_or(true),
    })
}

/// Catalog
///
/// Insertion-ordered product collection with an id index. Construction
/// enforces unique ids and a single currency across all products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from normalized products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if two products share an id or carry
    /// different currencies.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        let mut currency: Option<&'static Currency> = None;

        for (position, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            match currency {
                None => currency = Some(product_currency),
                Some(existing) if existing != product_currency => {
                    return Err(CatalogError::CurrencyMismatch {
                        id: product.id,
                        product: product_currency.iso_alpha_code,
                        catalog: existing.iso_alpha_code,
                    });
                }
                Some(_) => {}
            }

            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId { id: product.id });
            }
        }

        Ok(Self { products, index })
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|position| self.products.get(*position))
    }

    /// Iterate products in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The catalog currency, taken from its products.
    ///
    /// `None` for an empty catalog.
    #[must_use]
    pub fn currency(&self) -> Option<&'static Currency> {
        self.products.first().map(|product| product.price.currency())
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
