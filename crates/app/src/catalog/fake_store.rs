//! Fake Store API client.

use async_trait::async_trait;
use barrow::catalog::{Catalog, RawProduct, normalize};
use reqwest::Client;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::iso::USD;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogSourceError, ProductSource};

/// Product source backed by the public Fake Store API.
///
/// Prices are listed in USD; stock information is not part of the API, so
/// every product is treated as available.
#[derive(Debug, Clone)]
pub struct FakeStoreSource {
    base_url: String,
    http: Client,
}

impl FakeStoreSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ProductSource for FakeStoreSource {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogSourceError> {
        let url = format!("{}/products", self.base_url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogSourceError::UnexpectedResponse(format!(
                "products request failed with status {status}: {text}"
            )));
        }

        let records: Vec<FakeStoreProduct> = response.json().await?;

        debug!(count = records.len(), "fetched fake store products");

        let products = records
            .into_iter()
            .map(|record| normalize(record.into_raw(), USD))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::from_products(products)?)
    }
}

/// Wire format of one Fake Store product.
#[derive(Debug, Deserialize)]
struct FakeStoreProduct {
    id: i64,
    title: String,
    price: f64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    rating: FakeStoreRating,
}

#[derive(Debug, Default, Deserialize)]
struct FakeStoreRating {
    #[serde(default)]
    rate: f64,
    #[serde(default)]
    count: u32,
}

impl FakeStoreProduct {
    fn into_raw(self) -> RawProduct {
        RawProduct {
            id: Some(self.id),
            name: Some(self.title),
            // Float prices pick up representation noise; two decimals is
            // what the API means.
            price: Decimal::from_f64(self.price).map(|price| price.round_dp(2)),
            image: Some(self.image),
            category: Some(self.category),
            description: Some(self.description),
            rating: Some(self.rating.rate),
            reviews: Some(self.rating.count),
            in_stock: None,
        }
    }
}
