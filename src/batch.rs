// 📋 Batch Validation - Validate a column of CLABEs from a CSV file
//
// Each row is decoded independently: a rejected CLABE is recorded in the
// report and the batch keeps going. Only unreadable CSV aborts.

use crate::clabe::ClabeRecord;
use crate::entities::bank::BankRegistry;
use crate::error::DecodeErrorKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// Header used when the caller does not name a column
pub const DEFAULT_COLUMN: &str = "clabe";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("column {column:?} not found in CSV header")]
    MissingColumn { column: String },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Valid(ClabeRecord),
    Invalid { kind: DecodeErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,
    pub input: String,
    pub outcome: RowOutcome,
}

impl BatchRow {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, RowOutcome::Valid(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_kind: BTreeMap<DecodeErrorKind, usize>,
}

impl BatchReport {
    fn push(&mut self, row: BatchRow) {
        self.total += 1;
        match &row.outcome {
            RowOutcome::Valid(_) => self.valid += 1,
            RowOutcome::Invalid { kind, .. } => {
                self.invalid += 1;
                *self.by_kind.entry(*kind).or_insert(0) += 1;
            }
        }
        self.rows.push(row);
    }

    /// Rows that failed validation
    pub fn rejected(&self) -> impl Iterator<Item = &BatchRow> {
        self.rows.iter().filter(|r| !r.is_valid())
    }

    /// Export as `line,input,valid,bank_code,bank_name,error`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["line", "input", "valid", "bank_code", "bank_name", "error"])?;

        for row in &self.rows {
            let line = row.line.to_string();
            match &row.outcome {
                RowOutcome::Valid(record) => wtr.write_record([
                    line.as_str(),
                    row.input.as_str(),
                    "true",
                    record.bank.code.as_str(),
                    record.bank.name.as_str(),
                    "",
                ])?,
                RowOutcome::Invalid { message, .. } => wtr.write_record([
                    line.as_str(),
                    row.input.as_str(),
                    "false",
                    "",
                    "",
                    message.as_str(),
                ])?,
            }
        }

        wtr.flush()?;
        Ok(())
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate the `column` of every row in a headed CSV
pub fn validate_csv<R: Read>(
    reader: R,
    column: &str,
    registry: &BankRegistry,
) -> Result<BatchReport, BatchError> {
    // Cells are decoded exactly as written: padding is a malformed CLABE
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let index = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| BatchError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut report = BatchReport::default();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let input = record.get(index).unwrap_or_default().to_string();

        let outcome = match registry.decode(&input) {
            Ok(clabe) => RowOutcome::Valid(clabe.to_record()),
            Err(e) => {
                tracing::debug!(line, input = %input, error = %e, "rejected CLABE");
                RowOutcome::Invalid {
                    kind: e.kind(),
                    message: e.to_string(),
                }
            }
        };

        report.push(BatchRow { line, input, outcome });
    }

    tracing::info!(
        total = report.total,
        valid = report.valid,
        invalid = report.invalid,
        "batch validation finished"
    );

    Ok(report)
}

/// Validate a CSV file on disk
pub fn validate_csv_path<P: AsRef<Path>>(
    path: P,
    column: &str,
    registry: &BankRegistry,
) -> Result<BatchReport, BatchError> {
    let file = std::fs::File::open(path)?;
    validate_csv(file, column, registry)
}
