//! Saleor GraphQL API client.
//!
//! Provides access to the voucher operations of a Saleor store: searching
//! for existing vouchers, creating new ones, attaching channel listings, and
//! restricting vouchers to product collections.
//!
//! # Architecture
//!
//! - Raw GraphQL documents posted through a shared `reqwest` client
//! - Transport-level `errors` arrays are converted to [`SaleorError::GraphQL`]
//! - Mutation-level `discountErrors` lists are data, not errors: operations
//!   return them as the rejected side of their result type so callers can
//!   record partial failures per record

pub mod client;
pub mod vouchers;

pub use client::SaleorClient;
pub use vouchers::{
    MutationStatus, VoucherCreateInput, VoucherCreateOutcome, VoucherSummary, VoucherType,
};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with the Saleor API.
#[derive(Debug, Error)]
pub enum SaleorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The token was rejected.
    #[error("Unauthorized - check SALEOR_TOKEN")]
    Unauthorized,
}

/// A GraphQL error returned by the Saleor API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A field-level validation error returned inside a mutation payload.
///
/// Saleor reports these in the `discountErrors` list of each voucher
/// mutation; the request itself still succeeds at the transport level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscountError {
    /// Input field the error refers to, if any.
    #[serde(default)]
    pub field: Option<String>,
    /// Error message.
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render a `discountErrors` list as `field: message` pairs for logging.
#[must_use]
pub fn format_discount_errors(errors: &[DiscountError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_deref().unwrap_or_default();
            format!("{}: {}", field, e.message)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
