//! Per-record import orchestration.
//!
//! Records are processed strictly in input order; one record's full mutation
//! sequence completes before the next record begins. Transport errors abort
//! the run, while field-level validation rejections are recorded in the
//! report and the run continues.

use tracing::instrument;

use crate::config::ImportConfig;
use crate::records::VoucherRecord;
use crate::saleor::{
    DiscountError, MutationStatus, SaleorClient, SaleorError, VoucherCreateInput,
    VoucherCreateOutcome, VoucherType, format_discount_errors,
};

/// Stage of the per-record sequence a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    /// The `voucherCreate` mutation.
    Create,
    /// The channel listing attached after a successful create. A failure
    /// here means the voucher exists but is not listed on the channel.
    ChannelListing,
    /// The catalogue restriction applied when collections are configured.
    CatalogueAssignment,
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::ChannelListing => write!(f, "channel listing"),
            Self::CatalogueAssignment => write!(f, "catalogue assignment"),
        }
    }
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// Voucher created and fully enriched.
    Created {
        /// ID assigned by Saleor.
        voucher_id: String,
    },
    /// A voucher with this code already exists; nothing was mutated.
    AlreadyExists,
    /// The row carried no code and was skipped.
    SkippedBlankCode,
    /// A mutation was rejected with validation errors. Stages before
    /// `stage` did succeed, so `ChannelListing` and later mean the voucher
    /// itself was created.
    Failed {
        /// The stage that was rejected.
        stage: ImportStage,
        /// The validation errors the API returned.
        errors: Vec<DiscountError>,
    },
}

/// Outcome of one input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The code from the input row.
    pub code: String,
    /// What happened to it.
    pub status: RecordStatus,
}

/// Summary of a full import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Per-record outcomes in input order.
    pub outcomes: Vec<RecordOutcome>,
}

impl ImportReport {
    /// Number of vouchers created and fully enriched.
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::Created { .. }))
    }

    /// Number of codes that already existed remotely.
    #[must_use]
    pub fn existing(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::AlreadyExists))
    }

    /// Number of rows skipped for a blank code.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::SkippedBlankCode))
    }

    /// Number of records rejected at some stage.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RecordStatus::Failed { .. }))
    }

    /// Whether any record was rejected.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&RecordStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Run the import over all records.
///
/// # Errors
///
/// Returns `SaleorError` when a transport or API-level error occurs; the
/// run stops at the offending record. Validation rejections do not error,
/// they are recorded in the report.
pub async fn run_import(
    client: &SaleorClient,
    config: &ImportConfig,
    records: &[VoucherRecord],
) -> Result<ImportReport, SaleorError> {
    let voucher_type = config.voucher_type();
    if voucher_type == VoucherType::SpecificProduct {
        tracing::info!("Vouchers will be valid for the configured product collections only");
    }

    let mut report = ImportReport::default();
    for record in records {
        let status = import_record(client, config, voucher_type, record).await?;
        report.outcomes.push(RecordOutcome {
            code: record.code.clone(),
            status,
        });
    }

    Ok(report)
}

#[instrument(skip_all, fields(code = %record.code))]
async fn import_record(
    client: &SaleorClient,
    config: &ImportConfig,
    voucher_type: VoucherType,
    record: &VoucherRecord,
) -> Result<RecordStatus, SaleorError> {
    if record.is_blank() {
        tracing::warn!("Row has no voucher code, skipping");
        return Ok(RecordStatus::SkippedBlankCode);
    }
    let code = record.code.as_str();

    tracing::info!("Checking if voucher {code} already exists");
    if let Some(existing) = client.find_voucher(code).await? {
        tracing::info!(voucher_id = %existing.id, "Voucher already exists");
        return Ok(RecordStatus::AlreadyExists);
    }

    let input = VoucherCreateInput {
        code,
        voucher_type,
        end_date: config.end_date,
    };
    let voucher_id = match client.create_voucher(&input).await? {
        VoucherCreateOutcome::Created { id } => id,
        VoucherCreateOutcome::Rejected(errors) => {
            tracing::warn!(
                errors = %format_discount_errors(&errors),
                "Voucher create rejected"
            );
            return Ok(RecordStatus::Failed {
                stage: ImportStage::Create,
                errors,
            });
        }
    };
    tracing::info!(voucher_id = %voucher_id, "Created voucher");

    let listing = client
        .update_channel_listing(&voucher_id, &config.channel_id, config.discount_percentage)
        .await?;
    if let MutationStatus::Rejected(errors) = listing {
        tracing::warn!(
            voucher_id = %voucher_id,
            errors = %format_discount_errors(&errors),
            "Channel listing rejected, voucher is not listed on the channel"
        );
        return Ok(RecordStatus::Failed {
            stage: ImportStage::ChannelListing,
            errors,
        });
    }

    if !config.collection_ids.is_empty() {
        tracing::info!("Restricting voucher to the configured collections");
        let catalogues = client
            .add_catalogues(&voucher_id, &config.collection_ids)
            .await?;
        if let MutationStatus::Rejected(errors) = catalogues {
            tracing::warn!(
                voucher_id = %voucher_id,
                errors = %format_discount_errors(&errors),
                "Catalogue assignment rejected"
            );
            return Ok(RecordStatus::Failed {
                stage: ImportStage::CatalogueAssignment,
                errors,
            });
        }
    }

    Ok(RecordStatus::Created { voucher_id })
}
