//! Bundled demo catalog.

use async_trait::async_trait;
use barrow::{catalog::Catalog, fixtures::catalog::CatalogFixture};

use crate::catalog::{CatalogSourceError, ProductSource};

const DEMO_CATALOG: &str = include_str!("../../../../fixtures/catalog/demo.yml");

/// Product source backed by the demo catalog compiled into the binary.
///
/// Works offline and needs no configuration, which makes it the default
/// source and the backbone of the test suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl BundledSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse the embedded catalog without going through the async trait.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogSourceError`] if the embedded document fails to
    /// parse or normalize, which would mean the binary shipped with a bad
    /// catalog.
    pub fn catalog(&self) -> Result<Catalog, CatalogSourceError> {
        let fixture: CatalogFixture = DEMO_CATALOG.parse()?;
        let (products, _currency) = fixture.into_products()?;

        Ok(Catalog::from_products(products)?)
    }
}

#[async_trait]
impl ProductSource for BundledSource {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogSourceError> {
        self.catalog()
    }
}
