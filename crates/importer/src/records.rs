//! CSV source for voucher records.
//!
//! The input file needs a `code` column; any other columns are ignored. Rows
//! are returned in file order, and validation of individual codes is left to
//! the pipeline so a blank row never aborts the read.

use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading the input file.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The CSV file could not be opened or parsed.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoucherRecord {
    /// The discount code to import. Empty when the cell (or the whole
    /// column) is missing.
    #[serde(default)]
    pub code: String,
}

impl VoucherRecord {
    /// Returns `true` when the row carries no usable code.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Load all voucher records from a CSV file, preserving input order.
///
/// # Errors
///
/// Returns `RecordError::Csv` if the file cannot be opened or a row cannot
/// be parsed.
pub fn load_voucher_records(path: impl AsRef<Path>) -> Result<Vec<VoucherRecord>, RecordError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_records(reader)
}

fn collect_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<VoucherRecord>, RecordError> {
    let records = reader
        .deserialize()
        .collect::<Result<Vec<VoucherRecord>, csv::Error>>()?;
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn read(data: &str) -> Vec<VoucherRecord> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        collect_records(reader).unwrap()
    }

    #[test]
    fn test_reads_codes_in_input_order() {
        let records = read("code\nSAVE10\nSAVE20\nSAVE30\n");
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["SAVE10", "SAVE20", "SAVE30"]);
    }

    #[test]
    fn test_ignores_extra_columns() {
        let records = read("code,campaign\nSAVE10,spring\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "SAVE10");
    }

    #[test]
    fn test_missing_code_column_yields_blank_records() {
        let records = read("campaign\nspring\n");
        assert_eq!(records.len(), 1);
        assert!(records[0].is_blank());
    }

    #[test]
    fn test_blank_row_does_not_abort_the_read() {
        let records = read("code\nSAVE10\n\"\"\nSAVE30\n");
        assert_eq!(records.len(), 3);
        assert!(records[1].is_blank());
        assert_eq!(records[2].code, "SAVE30");
    }

    #[test]
    fn test_codes_are_trimmed() {
        let records = read("code\n  SAVE10  \n");
        assert_eq!(records[0].code, "SAVE10");
    }

    #[test]
    fn test_empty_file_yields_no_records() {
        assert!(read("code\n").is_empty());
    }

    #[test]
    fn test_is_blank_on_whitespace_only_code() {
        let record = VoucherRecord {
            code: "   ".to_string(),
        };
        assert!(record.is_blank());
    }
}
