//! Voucher importer - loads discount codes from a CSV file and creates the
//! missing ones in a Saleor store via its GraphQL API.
//!
//! # Pipeline
//!
//! For each CSV row the importer runs a lookup → conditional create →
//! conditional enrich sequence against the remote API:
//!
//! 1. Search for the code; a match means the voucher already exists and no
//!    mutation is issued (re-runs are idempotent).
//! 2. Create the voucher with the configured expiration date and usage
//!    policy.
//! 3. Attach the voucher to the configured sales channel with the configured
//!    percentage discount.
//! 4. If collection IDs are configured, restrict the voucher to those
//!    collections.
//!
//! Execution is strictly sequential; one record's mutation sequence completes
//! before the next record begins.
//!
//! # Modules
//!
//! - [`records`] - CSV row source
//! - [`config`] - environment and run configuration
//! - [`saleor`] - Saleor GraphQL client and voucher operations
//! - [`pipeline`] - per-record orchestration and the import report

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod pipeline;
pub mod records;
pub mod saleor;

pub use config::{ConfigError, ImportConfig, SaleorConfig};
pub use pipeline::{ImportReport, ImportStage, RecordOutcome, RecordStatus, run_import};
pub use records::{RecordError, VoucherRecord, load_voucher_records};
pub use saleor::{DiscountError, SaleorClient, SaleorError, VoucherType};
