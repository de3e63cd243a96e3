//! Product catalog sources.
//!
//! Each source speaks its own wire format and converges on the same
//! normalized [`Catalog`] through [`barrow::catalog::normalize`]; nothing
//! past this module knows which backend the products came from.

mod bundled;
mod fake_store;
mod hosted;

use async_trait::async_trait;
use barrow::{
    catalog::{Catalog, CatalogError},
    fixtures::FixtureError,
};
use mockall::automock;
use thiserror::Error;

pub use bundled::BundledSource;
pub use fake_store::FakeStoreSource;
pub use hosted::{HostedConfig, HostedSource};

#[derive(Debug, Error)]
pub enum CatalogSourceError {
    #[error("http error")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from product API: {0}")]
    UnexpectedResponse(String),

    #[error("bundled catalog error")]
    Fixture(#[source] FixtureError),

    #[error("invalid product data")]
    Catalog(#[from] CatalogError),
}

impl From<FixtureError> for CatalogSourceError {
    fn from(error: FixtureError) -> Self {
        Self::Fixture(error)
    }
}

#[automock]
#[async_trait]
/// Product retrieval operations.
pub trait ProductSource: Send + Sync {
    /// Fetches the full product catalog, normalized and validated.
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogSourceError>;
}
