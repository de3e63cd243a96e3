//! Application configuration.

use clap::Args;

/// Backend the product catalog is loaded from.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CatalogSourceKind {
    /// Demo catalog embedded in the binary.
    Bundled,

    /// Public Fake Store API.
    FakeStore,

    /// Hosted products API.
    Hosted,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Catalog source selection and connection settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Product source backing the storefront (bundled, fake-store, hosted)
    #[arg(
        long,
        env = "CATALOG_SOURCE",
        value_enum,
        default_value_t = CatalogSourceKind::Bundled
    )]
    pub source: CatalogSourceKind,

    /// Base URL of the Fake Store API
    #[arg(
        long,
        env = "FAKE_STORE_URL",
        default_value = "https://fakestoreapi.com"
    )]
    pub fake_store_url: String,

    /// Base URL of the hosted products API
    #[arg(long, env = "HOSTED_API_URL")]
    pub hosted_url: Option<String>,

    /// API key for the hosted products API
    #[arg(long, env = "HOSTED_API_KEY", hide_env_values = true)]
    pub hosted_api_key: Option<String>,

    /// ISO 4217 code of the currency the hosted API lists prices in
    #[arg(long, env = "HOSTED_CURRENCY", default_value = "INR")]
    pub hosted_currency: String,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
