//! Utils

use clap::Parser;

use crate::{cart::CartAction, catalog::Catalog};

/// Arguments for the cart examples
#[derive(Debug, Parser)]
pub struct ExampleCartArgs {
    /// Number of catalog products to add to the cart
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the catalog
    #[clap(short, long, default_value = "demo")]
    pub fixture: String,
}

/// Build add-to-cart actions for the first `n` in-stock catalog products.
#[must_use]
pub fn sample_actions(catalog: &Catalog, n: Option<usize>) -> Vec<CartAction> {
    catalog
        .iter()
        .filter(|product| product.in_stock)
        .take(n.unwrap_or(usize::MAX))
        .map(|product| CartAction::AddToCart {
            product: product.clone(),
            quantity: 1,
        })
        .collect()
}
