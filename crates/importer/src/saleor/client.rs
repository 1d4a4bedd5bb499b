//! HTTP transport for the Saleor GraphQL API.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use super::{GraphQLError, GraphQLErrorLocation, SaleorError};
use crate::config::SaleorConfig;

/// Saleor GraphQL API client.
///
/// Cheap to clone; all clones share one HTTP connection pool. The app token
/// is sent verbatim in the `Authorization` header on every request.
#[derive(Clone)]
pub struct SaleorClient {
    inner: Arc<SaleorClientInner>,
}

struct SaleorClientInner {
    client: reqwest::Client,
    endpoint: Url,
    token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl SaleorClient {
    /// Create a new client from connection settings.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &SaleorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(SaleorClientInner {
                client,
                endpoint: config.api_url.clone(),
                token: config.token.clone(),
            }),
        }
    }

    /// Execute a GraphQL document.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError::RateLimited` if the API throttles the request.
    /// Returns `SaleorError::Unauthorized` if the token is rejected.
    /// Returns `SaleorError::GraphQL` if the response carries errors.
    /// Returns `SaleorError::Http` on network failures.
    #[instrument(skip(self, query, variables))]
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, SaleorError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(AUTHORIZATION, self.inner.token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(SaleorError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SaleorError::Unauthorized);
        }

        let payload = response.text().await?;
        let graphql_response: GraphQLResponse<T> = serde_json::from_str(&payload)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(SaleorError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            SaleorError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> SaleorConfig {
        SaleorConfig {
            api_url: Url::parse("https://shop.example.com/graphql/").unwrap(),
            token: SecretString::from("test-token"),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = SaleorClient::new(&test_config());
        assert_eq!(
            client.inner.endpoint.as_str(),
            "https://shop.example.com/graphql/"
        );
    }

    #[test]
    fn test_clones_share_the_connection() {
        let client = SaleorClient::new(&test_config());
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
    }
}
