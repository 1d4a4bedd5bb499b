//! Importer configuration.
//!
//! # Environment Variables
//!
//! - `SALEOR_URL` - GraphQL endpoint of the Saleor instance
//! - `SALEOR_TOKEN` - app token, sent verbatim in the `Authorization` header
//!
//! Both are read after loading a local `.env` file if one is present. The
//! per-run options (channel, discount, expiration, collection restrictions)
//! are not environment-driven; they are carried by [`ImportConfig`] and set
//! from the command line.

use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::saleor::VoucherType;

/// Channel new vouchers are listed on unless overridden.
pub const DEFAULT_CHANNEL_ID: &str = "Q2hhbm5lbDox";

/// Percentage discount applied on the channel listing unless overridden.
pub const DEFAULT_DISCOUNT_PERCENTAGE: f64 = 15.0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the Saleor GraphQL API.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SaleorConfig {
    /// GraphQL endpoint URL
    pub api_url: Url,
    /// App token, passed as-is in the `Authorization` header (Saleor app
    /// tokens carry their own scheme)
    pub token: SecretString,
}

impl std::fmt::Debug for SaleorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaleorConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SaleorConfig {
    /// Load connection settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SALEOR_URL` or `SALEOR_TOKEN` is missing,
    /// or if `SALEOR_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("SALEOR_URL")?;
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SALEOR_URL".to_string(), e.to_string()))?;
        let token = SecretString::from(get_required_env("SALEOR_TOKEN")?);

        Ok(Self { api_url, token })
    }
}

/// Per-run import settings, passed into the pipeline at invocation time.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Collections the vouchers are restricted to. Empty means the discount
    /// applies to entire orders.
    pub collection_ids: Vec<String>,
    /// Channel the vouchers are listed on.
    pub channel_id: String,
    /// Percentage discount attached to the channel listing.
    pub discount_percentage: f64,
    /// Expiration date of created vouchers.
    pub end_date: DateTime<Utc>,
}

impl ImportConfig {
    /// Voucher type implied by the catalogue restriction policy: any
    /// configured collection makes the discount product-specific, otherwise
    /// it applies to the entire order.
    #[must_use]
    pub fn voucher_type(&self) -> VoucherType {
        if self.collection_ids.is_empty() {
            VoucherType::EntireOrder
        } else {
            VoucherType::SpecificProduct
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            collection_ids: Vec::new(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            discount_percentage: DEFAULT_DISCOUNT_PERCENTAGE,
            end_date: default_end_date(),
        }
    }
}

/// Default expiration for created vouchers: 2021-12-31T00:00:00Z.
#[must_use]
pub fn default_end_date() -> DateTime<Utc> {
    Utc.timestamp_opt(1_640_908_800, 0)
        .single()
        .unwrap_or_default()
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}
