//! Hosted products API client.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use barrow::catalog::{Catalog, RawProduct, normalize};
use reqwest::Client;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHasher;
use rusty_money::iso::Currency;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogSourceError, ProductSource};

/// Connection settings for the hosted products API.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Base address of the API, e.g. `"https://project.example.co"`.
    pub url: String,

    /// Project API key, sent as both the `apikey` header and bearer token.
    pub api_key: String,

    /// Currency the hosted prices are listed in.
    pub currency: &'static Currency,
}

/// Product source backed by a hosted PostgREST products table.
///
/// Rows carry UUID primary keys and a joined category name; both are
/// flattened into the normalized product shape.
#[derive(Debug, Clone)]
pub struct HostedSource {
    config: HostedConfig,
    http: Client,
}

impl HostedSource {
    #[must_use]
    pub fn new(config: HostedConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ProductSource for HostedSource {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogSourceError> {
        let url = format!(
            "{}/rest/v1/products?select=*,categories(name)",
            self.config.url
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CatalogSourceError::UnexpectedResponse(format!(
                "products request failed with status {status}: {text}"
            )));
        }

        let records: Vec<HostedProduct> = response.json().await?;

        debug!(count = records.len(), "fetched hosted products");

        let currency = self.config.currency;
        let products = records
            .into_iter()
            .map(|record| normalize(record.into_raw(), currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::from_products(products)?)
    }
}

/// Wire format of one hosted product row with its joined category.
#[derive(Debug, Deserialize)]
struct HostedProduct {
    id: String,
    name: String,
    price: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    in_stock: Option<bool>,
    #[serde(default)]
    stock_quantity: Option<i64>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    reviews_count: Option<u32>,
    #[serde(default)]
    categories: Option<HostedCategory>,
}

#[derive(Debug, Deserialize)]
struct HostedCategory {
    name: String,
}

impl HostedProduct {
    fn into_raw(self) -> RawProduct {
        // Rows without an explicit stock flag fall back to their counted
        // stock; rows with neither are treated as available.
        let in_stock = self
            .in_stock
            .or_else(|| self.stock_quantity.map(|quantity| quantity > 0));

        RawProduct {
            id: Some(stable_id(&self.id)),
            name: Some(self.name),
            price: Decimal::from_f64(self.price).map(|price| price.round_dp(2)),
            image: self.image_url,
            category: self.categories.map(|category| category.name),
            description: self.description,
            rating: self.rating,
            reviews: self.reviews_count,
            in_stock,
        }
    }
}

/// Derive a stable numeric id from a row's UUID string.
///
/// The cart keys lines by integer id; hashing the UUID keeps ids stable
/// across fetches without a lookup table.
fn stable_id(row_id: &str) -> i64 {
    let mut hasher = FxHasher::default();

    row_id.hash(&mut hasher);

    i64::from_ne_bytes(hasher.finish().to_ne_bytes())
}
