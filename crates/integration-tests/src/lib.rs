//! Integration tests for the voucher importer.
//!
//! The tests in `tests/` run the full import pipeline against a `wiremock`
//! server standing in for the Saleor GraphQL endpoint, so no real network
//! traffic is made. This crate holds the shared fixtures: a client factory
//! pointed at the mock server and builders for the canned GraphQL responses.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use serde_json::json;
use url::Url;

use voucher_importer::{SaleorClient, SaleorConfig, VoucherRecord};

/// Build a client pointed at a mock server.
///
/// # Panics
///
/// Panics if `server_uri` is not a valid URL.
#[must_use]
pub fn test_client(server_uri: &str) -> SaleorClient {
    let config = SaleorConfig {
        api_url: Url::parse(server_uri).expect("mock server URI should parse"),
        token: SecretString::from("test-token"),
    };
    SaleorClient::new(&config)
}

/// Build a record list from plain codes.
#[must_use]
pub fn records(codes: &[&str]) -> Vec<VoucherRecord> {
    codes
        .iter()
        .map(|code| VoucherRecord {
            code: (*code).to_string(),
        })
        .collect()
}

/// Voucher search response with no matches.
#[must_use]
pub fn lookup_empty() -> serde_json::Value {
    json!({ "data": { "vouchers": { "edges": [] } } })
}

/// Voucher search response with one match.
#[must_use]
pub fn lookup_match(id: &str, code: &str) -> serde_json::Value {
    json!({
        "data": {
            "vouchers": {
                "edges": [ { "node": { "id": id, "code": code } } ]
            }
        }
    })
}

/// Successful `voucherCreate` response.
#[must_use]
pub fn create_ok(id: &str) -> serde_json::Value {
    json!({
        "data": {
            "voucherCreate": {
                "voucher": { "id": id, "name": null },
                "discountErrors": []
            }
        }
    })
}

/// `voucherCreate` response rejected with one field error.
#[must_use]
pub fn create_rejected(field: &str, message: &str) -> serde_json::Value {
    json!({
        "data": {
            "voucherCreate": {
                "voucher": null,
                "discountErrors": [ { "field": field, "message": message } ]
            }
        }
    })
}

/// Successful `voucherChannelListingUpdate` response.
#[must_use]
pub fn channel_listing_ok() -> serde_json::Value {
    json!({
        "data": {
            "voucherChannelListingUpdate": { "discountErrors": [] }
        }
    })
}

/// `voucherChannelListingUpdate` response rejected with one field error.
#[must_use]
pub fn channel_listing_rejected(field: &str, message: &str) -> serde_json::Value {
    json!({
        "data": {
            "voucherChannelListingUpdate": {
                "discountErrors": [ { "field": field, "message": message } ]
            }
        }
    })
}

/// Successful `voucherCataloguesAdd` response.
#[must_use]
pub fn catalogues_ok() -> serde_json::Value {
    json!({
        "data": {
            "voucherCataloguesAdd": { "discountErrors": [] }
        }
    })
}

/// Top-level GraphQL error response (transport-level failure).
#[must_use]
pub fn graphql_errors(message: &str) -> serde_json::Value {
    json!({
        "data": null,
        "errors": [ { "message": message } ]
    })
}
