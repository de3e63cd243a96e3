//! Storefront Checkout Example
//!
//! This example fills a cart from a catalog fixture, reacts to store updates,
//! and prints the final receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of products added

use std::io;

use anyhow::Result;
use clap::Parser;

use barrow::{
    cart::CartAction,
    fixtures::Fixture,
    pricing::CheckoutPolicy,
    receipt::CartReceipt,
    utils::{ExampleCartArgs, sample_actions},
};

/// Storefront Checkout Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = ExampleCartArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog()?;
    let mut store = fixture.store()?;

    let key = store.subscribe(|state| {
        println!(
            "cart changed: {} item(s), total {}",
            state.item_count(),
            state.total()
        );
    });

    for action in sample_actions(&catalog, args.n) {
        store.dispatch(&action);
    }

    // Add the first product a second time to show quantity merging.
    if let Some(first) = catalog.iter().find(|product| product.in_stock) {
        store.dispatch(&CartAction::AddToCart {
            product: first.clone(),
            quantity: 1,
        });
    }

    store.unsubscribe(key);

    let policy = CheckoutPolicy::standard(store.state().currency());
    let state = store.state();
    let receipt = CartReceipt::for_cart(&state, &policy)?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    receipt.write_to(handle)?;

    Ok(())
}
