//! Voucher operations and their GraphQL documents.
//!
//! Each mutation selects its `discountErrors` list and returns it as data
//! rather than raising: a voucher that the API refuses to create is a
//! rejected outcome, not a transport failure.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{DiscountError, GraphQLError, SaleorClient, SaleorError};

const VOUCHER_LIST_QUERY: &str = r"
    query VoucherList($voucher: String) {
        vouchers(filter: { search: $voucher }, first: 1) {
            edges {
                node {
                    id
                    code
                }
            }
        }
    }
";

const VOUCHER_CREATE_MUTATION: &str = r"
    mutation VoucherCreate($code: String, $type: VoucherTypeEnum, $endDate: DateTime) {
        voucherCreate(
            input: {
                type: $type
                code: $code
                applyOncePerCustomer: true
                applyOncePerOrder: false
                usageLimit: 1
                discountValueType: PERCENTAGE
                endDate: $endDate
            }
        ) {
            voucher {
                id
                name
            }
            discountErrors {
                field
                message
            }
        }
    }
";

const CHANNEL_LISTING_UPDATE_MUTATION: &str = r"
    mutation VoucherChannelListingUpdate($id: ID!, $channelId: ID!, $discountValue: PositiveDecimal) {
        voucherChannelListingUpdate(
            id: $id
            input: { addChannels: { channelId: $channelId, discountValue: $discountValue } }
        ) {
            discountErrors {
                field
                message
            }
        }
    }
";

const CATALOGUES_ADD_MUTATION: &str = r"
    mutation VoucherCataloguesAdd($id: ID!, $input: CatalogueInput!) {
        voucherCataloguesAdd(id: $id, input: $input) {
            discountErrors {
                field
                message
            }
        }
    }
";

/// How a voucher's discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherType {
    /// Discount applies to the entire order.
    EntireOrder,
    /// Discount applies to specific products/collections only.
    SpecificProduct,
}

/// Input for creating a voucher.
///
/// Usage constraints are fixed by policy: one use per customer, not
/// stackable per order, a single global use, percentage-based discount.
#[derive(Debug)]
pub struct VoucherCreateInput<'a> {
    /// Customer-facing discount code.
    pub code: &'a str,
    /// Discount scope.
    pub voucher_type: VoucherType,
    /// When the voucher expires.
    pub end_date: DateTime<Utc>,
}

/// A voucher as returned by the search query.
#[derive(Debug, Clone, Deserialize)]
pub struct VoucherSummary {
    /// Opaque ID assigned by Saleor.
    pub id: String,
    /// Discount code.
    pub code: String,
}

/// Result of a `voucherCreate` call that reached the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherCreateOutcome {
    /// The voucher was created.
    Created {
        /// ID assigned by Saleor.
        id: String,
    },
    /// The API refused the input.
    Rejected(Vec<DiscountError>),
}

/// Result of a side-effect mutation (channel listing, catalogue add).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    /// The mutation was applied.
    Applied,
    /// The API refused the input.
    Rejected(Vec<DiscountError>),
}

#[derive(Debug, Deserialize)]
struct VoucherListData {
    vouchers: VoucherConnection,
}

#[derive(Debug, Deserialize)]
struct VoucherConnection {
    edges: Vec<VoucherEdge>,
}

#[derive(Debug, Deserialize)]
struct VoucherEdge {
    node: VoucherSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoucherCreateData {
    voucher_create: Option<VoucherCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoucherCreatePayload {
    voucher: Option<CreatedVoucher>,
    #[serde(default)]
    discount_errors: Vec<DiscountError>,
}

#[derive(Debug, Deserialize)]
struct CreatedVoucher {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelListingUpdateData {
    voucher_channel_listing_update: Option<SideEffectPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CataloguesAddData {
    voucher_catalogues_add: Option<SideEffectPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SideEffectPayload {
    #[serde(default)]
    discount_errors: Vec<DiscountError>,
}

impl SaleorClient {
    /// Look up a voucher by code.
    ///
    /// Search semantics are the API's; only the first match is requested.
    /// Zero matches is the expected common case and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError` if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_voucher(&self, code: &str) -> Result<Option<VoucherSummary>, SaleorError> {
        let variables = serde_json::json!({ "voucher": code });

        let data: VoucherListData = self.execute(VOUCHER_LIST_QUERY, variables).await?;

        Ok(data.vouchers.edges.into_iter().next().map(|e| e.node))
    }

    /// Create a voucher.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError` if the API request fails. Field-level
    /// validation errors are not an `Err`; they surface as
    /// [`VoucherCreateOutcome::Rejected`].
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_voucher(
        &self,
        input: &VoucherCreateInput<'_>,
    ) -> Result<VoucherCreateOutcome, SaleorError> {
        let variables = serde_json::json!({
            "code": input.code,
            "type": input.voucher_type,
            "endDate": input.end_date.to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        let data: VoucherCreateData = self.execute(VOUCHER_CREATE_MUTATION, variables).await?;

        let Some(payload) = data.voucher_create else {
            return Err(missing_payload("voucherCreate"));
        };

        if !payload.discount_errors.is_empty() {
            return Ok(VoucherCreateOutcome::Rejected(payload.discount_errors));
        }

        payload
            .voucher
            .map(|v| VoucherCreateOutcome::Created { id: v.id })
            .ok_or_else(|| missing_payload("voucherCreate.voucher"))
    }

    /// Attach a voucher to a channel with a percentage discount value.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError` if the API request fails; validation errors
    /// surface as [`MutationStatus::Rejected`].
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn update_channel_listing(
        &self,
        voucher_id: &str,
        channel_id: &str,
        discount_value: f64,
    ) -> Result<MutationStatus, SaleorError> {
        let variables = serde_json::json!({
            "id": voucher_id,
            "channelId": channel_id,
            "discountValue": discount_value,
        });

        let data: ChannelListingUpdateData = self
            .execute(CHANNEL_LISTING_UPDATE_MUTATION, variables)
            .await?;

        let Some(payload) = data.voucher_channel_listing_update else {
            return Err(missing_payload("voucherChannelListingUpdate"));
        };

        Ok(payload.into_status())
    }

    /// Restrict a voucher to a set of product collections.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError` if the API request fails; validation errors
    /// surface as [`MutationStatus::Rejected`].
    #[instrument(skip(self, collection_ids), fields(voucher_id = %voucher_id))]
    pub async fn add_catalogues(
        &self,
        voucher_id: &str,
        collection_ids: &[String],
    ) -> Result<MutationStatus, SaleorError> {
        let variables = serde_json::json!({
            "id": voucher_id,
            "input": { "collections": collection_ids },
        });

        let data: CataloguesAddData = self.execute(CATALOGUES_ADD_MUTATION, variables).await?;

        let Some(payload) = data.voucher_catalogues_add else {
            return Err(missing_payload("voucherCataloguesAdd"));
        };

        Ok(payload.into_status())
    }
}

impl SideEffectPayload {
    fn into_status(self) -> MutationStatus {
        if self.discount_errors.is_empty() {
            MutationStatus::Applied
        } else {
            MutationStatus::Rejected(self.discount_errors)
        }
    }
}

fn missing_payload(field: &str) -> SaleorError {
    SaleorError::GraphQL(vec![GraphQLError {
        message: format!("No {field} in response"),
        locations: vec![],
        path: vec![],
    }])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_type_serializes_to_api_enum() {
        assert_eq!(
            serde_json::to_value(VoucherType::EntireOrder).unwrap(),
            "ENTIRE_ORDER"
        );
        assert_eq!(
            serde_json::to_value(VoucherType::SpecificProduct).unwrap(),
            "SPECIFIC_PRODUCT"
        );
    }

    #[test]
    fn test_create_payload_with_errors_is_rejected() {
        let payload: VoucherCreateData = serde_json::from_value(serde_json::json!({
            "voucherCreate": {
                "voucher": null,
                "discountErrors": [{ "field": "code", "message": "already exists" }]
            }
        }))
        .unwrap();

        let inner = payload.voucher_create.unwrap();
        assert!(inner.voucher.is_none());
        assert_eq!(inner.discount_errors.len(), 1);
        assert_eq!(inner.discount_errors[0].field.as_deref(), Some("code"));
    }

    #[test]
    fn test_side_effect_payload_status() {
        let clean = SideEffectPayload {
            discount_errors: vec![],
        };
        assert_eq!(clean.into_status(), MutationStatus::Applied);

        let rejected = SideEffectPayload {
            discount_errors: vec![DiscountError {
                field: None,
                message: "boom".to_string(),
            }],
        };
        assert!(matches!(rejected.into_status(), MutationStatus::Rejected(_)));
    }

    #[test]
    fn test_end_date_wire_format() {
        let input = VoucherCreateInput {
            code: "SAVE10",
            voucher_type: VoucherType::EntireOrder,
            end_date: crate::config::default_end_date(),
        };
        assert_eq!(
            input.end_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2021-12-31T00:00:00.000Z"
        );
    }
}
