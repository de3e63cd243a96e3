//! Fixtures

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::catalog::CatalogFixture,
    products::{Product, ProductId},
    store::CartStore,
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog validation error
    #[error("Invalid catalog data: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far, in file order
    products: Vec<Product>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture rooted at the workspace fixtures directory
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures"))
    }

    /// Create a new empty fixture with custom base path
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML catalog fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// currency differs from already-loaded products.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = contents.parse()?;

        let (products, file_currency) = fixture.into_products()?;

        match (self.currency, file_currency) {
            (Some(existing), Some(loaded)) if existing != loaded => {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    loaded.iso_alpha_code.to_string(),
                ));
            }
            (None, Some(loaded)) => self.currency = Some(loaded),
            _ => {}
        }

        self.products.extend(products);

        Ok(self)
    }

    /// Load a complete fixture set by name
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fixture cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get a product by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: i64) -> Result<&Product, FixtureError> {
        let id = ProductId::new(id);

        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(FixtureError::ProductNotFound(id.value()))
    }

    /// Get all products in file order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Build a catalog from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if catalog validation fails.
    pub fn catalog(&self) -> Result<Catalog, FixtureError> {
        Ok(Catalog::from_products(self.products.clone())?)
    }

    /// Create an empty cart store in the fixture currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn store(&self) -> Result<CartStore, FixtureError> {
        Ok(CartStore::new(self.currency()?))
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
