//! Catalog Fixtures

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};
use serde::Deserialize;

use crate::{
    catalog::{RawProduct, normalize},
    fixtures::FixtureError,
    products::Product,
};

/// Wrapper for the product list in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: i64,

    /// Product name
    pub name: String,

    /// Product price (e.g., "24999.00 INR")
    pub price: String,

    /// Product image URL
    #[serde(default)]
    pub image: String,

    /// Product category
    #[serde(default)]
    pub category: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Average review rating
    #[serde(default)]
    pub rating: f64,

    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,

    /// Whether the product is in stock
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl ProductFixture {
    /// Split the fixture into a raw descriptor and its declared currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the price string cannot be parsed.
    pub fn into_raw(self) -> Result<(RawProduct, &'static Currency), FixtureError> {
        let (amount, currency) = parse_price(&self.price)?;

        let raw = RawProduct {
            id: Some(self.id),
            name: Some(self.name),
            price: Some(amount),
            image: Some(self.image),
            category: Some(self.category),
            description: Some(self.description),
            rating: Some(self.rating),
            reviews: Some(self.reviews),
            in_stock: Some(self.in_stock),
        };

        Ok((raw, currency))
    }
}

impl CatalogFixture {
    /// Normalize every fixture entry, enforcing a single currency across the file.
    ///
    /// Returns the products in file order along with the shared currency
    /// (`None` when the file declares no products).
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed, if two entries declare
    /// different currencies, or if an entry fails catalog validation.
    pub fn into_products(
        self,
    ) -> Result<(Vec<Product>, Option<&'static Currency>), FixtureError> {
        let mut products = Vec::with_capacity(self.products.len());
        let mut currency: Option<&'static Currency> = None;

        for entry in self.products {
            let (raw, entry_currency) = entry.into_raw()?;

            match currency {
                None => currency = Some(entry_currency),
                Some(existing) if existing != entry_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        entry_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
            }

            products.push(normalize(raw, entry_currency)?);
        }

        Ok((products, currency))
    }
}

impl FromStr for CatalogFixture {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_norway::from_str(s)?)
    }
}

/// Parse a price string (e.g., "2499.00 INR") into a major-unit amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "INR" => INR,
        "USD" => USD,
        "GBP" => GBP,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((amount, currency))
}
