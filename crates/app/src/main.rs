//! Barrow Storefront CLI

use std::{process, sync::Arc};

use barrow::{
    pricing::CheckoutPolicy, products::ProductId, receipt::CartReceipt, store::CartStore,
};
use barrow_app::{
    auth::{Credentials, SessionAuthService},
    catalog::{BundledSource, FakeStoreSource, HostedConfig, HostedSource, ProductSource},
    config::{CatalogConfig, CatalogSourceKind, LogConfig},
    logging,
    notify::TracingNotifier,
    storage::JsonCartStorage,
    storefront::{CartPolicy, Storefront},
};
use clap::{Args, Parser, Subcommand};
use rusty_money::{Findable, iso::Currency};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "barrow", about = "Barrow storefront CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    log: LogConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the products of the configured catalog source
    Browse(BrowseArgs),

    /// Run a shopping session against the configured catalog source
    Shop(ShopArgs),
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[command(flatten)]
    catalog: CatalogConfig,
}

#[derive(Debug, Args)]
struct ShopArgs {
    #[command(flatten)]
    catalog: CatalogConfig,

    /// File the cart is restored from and saved to between runs
    #[arg(long, env = "CART_SNAPSHOT_PATH")]
    cart_file: Option<String>,

    /// Require a signed-in user before cart changes
    #[arg(long, env = "REQUIRE_SIGN_IN")]
    require_sign_in: bool,

    /// Email to sign in with
    #[arg(long, env = "SHOP_EMAIL")]
    email: Option<String>,

    /// Password to sign in with
    #[arg(long, env = "SHOP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Add a product: ID or ID:QTY, repeatable
    #[arg(long = "add", value_name = "ID[:QTY]", value_parser = parse_add_spec)]
    add: Vec<(i64, u32)>,

    /// Set a line quantity: ID:QTY, repeatable; 0 removes the line
    #[arg(long = "set", value_name = "ID:QTY", value_parser = parse_set_spec)]
    set: Vec<(i64, i64)>,

    /// Remove a product line by id, repeatable
    #[arg(long = "remove", value_name = "ID")]
    remove: Vec<i64>,

    /// Empty the cart before applying any other change
    #[arg(long)]
    clear: bool,

    /// Place the order after applying all changes
    #[arg(long)]
    checkout: bool,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    logging::init(&cli.log);

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Browse(args) => browse(args).await,
        Commands::Shop(args) => shop(args).await,
    }
}

async fn browse(args: BrowseArgs) -> Result<(), String> {
    let source = build_source(&args.catalog)?;

    let catalog = source
        .fetch_catalog()
        .await
        .map_err(|error| format!("failed to fetch catalog: {error}"))?;

    for product in &catalog {
        let stock = if product.in_stock { "" } else { "  [out of stock]" };

        println!("{:>20}  {}  {}{stock}", product.id, product.price, product.name);
    }

    println!("{} product(s)", catalog.len());

    Ok(())
}

async fn shop(args: ShopArgs) -> Result<(), String> {
    let source = build_source(&args.catalog)?;

    let catalog = source
        .fetch_catalog()
        .await
        .map_err(|error| format!("failed to fetch catalog: {error}"))?;

    let currency = catalog
        .currency()
        .ok_or_else(|| "the catalog has no products to shop from".to_string())?;

    let storage = args.cart_file.as_ref().map(JsonCartStorage::new);
    let store = restore_store(storage.as_ref(), currency);

    let auth = Arc::new(SessionAuthService::new());

    let mut storefront = Storefront::new(
        catalog,
        store,
        auth,
        Arc::new(TracingNotifier),
        CartPolicy {
            require_sign_in: args.require_sign_in,
            enforce_stock: true,
        },
        CheckoutPolicy::standard(currency),
    );

    if let (Some(email), Some(password)) = (args.email, args.password) {
        storefront
            .sign_in(Credentials::new(email, password))
            .await
            .map_err(|error| format!("sign in failed: {error}"))?;
    }

    if args.clear {
        storefront
            .clear_cart()
            .await
            .map_err(|error| format!("failed to clear cart: {error}"))?;
    }

    for (id, quantity) in args.add {
        storefront
            .add_to_cart(ProductId::new(id), quantity)
            .await
            .map_err(|error| format!("failed to add product {id}: {error}"))?;
    }

    for (id, quantity) in args.set {
        storefront
            .update_quantity(ProductId::new(id), quantity)
            .await
            .map_err(|error| format!("failed to set quantity for product {id}: {error}"))?;
    }

    for id in args.remove {
        storefront
            .remove_from_cart(ProductId::new(id))
            .await
            .map_err(|error| format!("failed to remove product {id}: {error}"))?;
    }

    let state = storefront.state();

    if state.is_empty() {
        println!("your cart is empty");
    } else {
        let receipt = CartReceipt::for_cart(&state, storefront.checkout_policy())
            .map_err(|error| format!("failed to derive order summary: {error}"))?;

        let stdout = std::io::stdout();

        receipt
            .write_to(stdout.lock())
            .map_err(|error| format!("failed to render receipt: {error}"))?;
    }

    if args.checkout {
        let summary = storefront
            .checkout()
            .await
            .map_err(|error| format!("checkout failed: {error}"))?;

        println!("order placed: {}", summary.grand_total());
    }

    if let Some(storage) = &storage {
        storage
            .save(&storefront.state())
            .map_err(|error| format!("failed to save cart snapshot: {error}"))?;
    }

    Ok(())
}

fn build_source(config: &CatalogConfig) -> Result<Arc<dyn ProductSource>, String> {
    match config.source {
        CatalogSourceKind::Bundled => Ok(Arc::new(BundledSource::new())),
        CatalogSourceKind::FakeStore => {
            Ok(Arc::new(FakeStoreSource::new(config.fake_store_url.clone())))
        }
        CatalogSourceKind::Hosted => {
            let url = config
                .hosted_url
                .clone()
                .ok_or_else(|| "HOSTED_API_URL must be set for the hosted source".to_string())?;
            let api_key = config
                .hosted_api_key
                .clone()
                .ok_or_else(|| "HOSTED_API_KEY must be set for the hosted source".to_string())?;
            let currency = Currency::find(&config.hosted_currency).ok_or_else(|| {
                format!("unknown hosted currency code: {}", config.hosted_currency)
            })?;

            Ok(Arc::new(HostedSource::new(HostedConfig {
                url,
                api_key,
                currency,
            })))
        }
    }
}

/// Restore the saved cart when one exists and matches the catalog currency.
fn restore_store(storage: Option<&JsonCartStorage>, currency: &'static Currency) -> CartStore {
    let Some(storage) = storage else {
        return CartStore::new(currency);
    };

    match storage.load() {
        Ok(Some(state)) if state.currency() == currency => CartStore::seeded(state),
        Ok(Some(state)) => {
            warn!(
                snapshot = state.currency().iso_alpha_code,
                catalog = currency.iso_alpha_code,
                "ignoring cart snapshot in a different currency"
            );

            CartStore::new(currency)
        }
        Ok(None) => CartStore::new(currency),
        Err(error) => {
            warn!(%error, "ignoring unreadable cart snapshot");

            CartStore::new(currency)
        }
    }
}

fn parse_add_spec(value: &str) -> Result<(i64, u32), String> {
    match value.split_once(':') {
        None => {
            let id = value
                .parse::<i64>()
                .map_err(|_err| format!("invalid product id: {value}"))?;

            Ok((id, 1))
        }
        Some((id, quantity)) => {
            let id = id
                .parse::<i64>()
                .map_err(|_err| format!("invalid product id: {id}"))?;
            let quantity = quantity
                .parse::<u32>()
                .map_err(|_err| format!("invalid quantity: {quantity}"))?;

            Ok((id, quantity))
        }
    }
}

fn parse_set_spec(value: &str) -> Result<(i64, i64), String> {
    let Some((id, quantity)) = value.split_once(':') else {
        return Err(format!("expected ID:QTY, got: {value}"));
    };

    let id = id
        .parse::<i64>()
        .map_err(|_err| format!("invalid product id: {id}"))?;
    let quantity = quantity
        .parse::<i64>()
        .map_err(|_err| format!("invalid quantity: {quantity}"))?;

    Ok((id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_specs_default_to_one_unit() {
        assert_eq!(parse_add_spec("5"), Ok((5, 1)));
        assert_eq!(parse_add_spec("5:3"), Ok((5, 3)));
        assert!(parse_add_spec("five").is_err());
        assert!(parse_add_spec("5:-1").is_err());
    }

    #[test]
    fn set_specs_require_a_quantity() {
        assert_eq!(parse_set_spec("5:0"), Ok((5, 0)));
        assert_eq!(parse_set_spec("5:-2"), Ok((5, -2)));
        assert!(parse_set_spec("5").is_err());
    }
}
