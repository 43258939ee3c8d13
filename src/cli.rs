// 🖥️ Command Line Interface - `clabe` subcommands
//
// Commands write to any `Write` so they run the same against stdout and in tests.
// Each returns `Ok(true)` when every input was valid; the binary maps `false`
// to exit code 1.

use crate::batch::{validate_csv_path, RowOutcome, DEFAULT_COLUMN};
use crate::clabe::compute_checksum;
use crate::entities::bank::BankRegistry;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

/// clabe - Validate and decode Mexican CLABE account numbers
///
/// Set CLABE_CATALOGUE to a `code,name` CSV to replace the embedded bank
/// catalogue. Logs go to stderr and are filtered by RUST_LOG.
#[derive(Debug, Parser)]
#[command(name = "clabe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode CLABEs and print one JSON line per argument
    Decode {
        /// 18-digit CLABE values
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Print the check digit for 17 leading digits
    Checksum {
        /// Bank code, plaza code and account number (17 digits)
        prefix: String,
    },

    /// List the bank catalogue
    Banks {
        /// Output as CSV (code,name)
        #[arg(long)]
        csv: bool,
        /// Only banks whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },

    /// Validate a column of CLABEs in a CSV file
    ValidateFile {
        /// CSV file with a header row
        path: PathBuf,
        /// Column holding the CLABE values
        #[arg(long, default_value = DEFAULT_COLUMN)]
        column: String,
        /// Write a per-row CSV report here
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// Run a parsed command, writing results to `out`
pub fn run<W: Write>(command: &Commands, registry: &BankRegistry, out: &mut W) -> Result<bool> {
    match command {
        Commands::Decode { values } => run_decode(values, registry, out),
        Commands::Checksum { prefix } => run_checksum(prefix, out),
        Commands::Banks { csv, search } => run_banks(*csv, search.as_deref(), registry, out),
        Commands::ValidateFile { path, column, out: report } => {
            run_validate_file(path, column, report.as_deref(), registry, out)
        }
    }
}

fn run_decode<W: Write>(values: &[String], registry: &BankRegistry, out: &mut W) -> Result<bool> {
    let mut all_valid = true;

    for input in values {
        let line = match registry.decode(input) {
            Ok(clabe) => serde_json::to_string(&clabe.to_record())?,
            Err(e) => {
                all_valid = false;
                serde_json::to_string(&serde_json::json!({
                    "raw_value": input,
                    "error": { "kind": e.kind(), "message": e.to_string() },
                }))?
            }
        };
        writeln!(out, "{}", line)?;
    }

    Ok(all_valid)
}

fn run_checksum<W: Write>(prefix: &str, out: &mut W) -> Result<bool> {
    let digit = compute_checksum(prefix).context("Failed to compute checksum")?;
    writeln!(out, "{}", digit)?;
    Ok(true)
}

fn run_banks<W: Write>(
    as_csv: bool,
    search: Option<&str>,
    registry: &BankRegistry,
    out: &mut W,
) -> Result<bool> {
    let banks: Vec<_> = match search {
        Some(text) => registry.find_by_name(text),
        None => registry.banks().iter().collect(),
    };

    if as_csv {
        let mut wtr = csv::Writer::from_writer(&mut *out);
        for bank in banks {
            wtr.serialize(bank)?;
        }
        wtr.flush()?;
    } else {
        for bank in banks {
            writeln!(out, "{}  {}", bank.code, bank.name)?;
        }
    }

    Ok(true)
}

fn run_validate_file<W: Write>(
    path: &Path,
    column: &str,
    report_path: Option<&Path>,
    registry: &BankRegistry,
    out: &mut W,
) -> Result<bool> {
    writeln!(out, "📂 Validating {} (column {:?})...", path.display(), column)?;
    let report = validate_csv_path(path, column, registry)
        .with_context(|| format!("Failed to validate {}", path.display()))?;

    writeln!(out, "✓ {} rows, {} valid, {} invalid", report.total, report.valid, report.invalid)?;
    for (kind, count) in &report.by_kind {
        writeln!(out, "   {}: {}", kind.as_str(), count)?;
    }
    for row in report.rejected() {
        if let RowOutcome::Invalid { message, .. } = &row.outcome {
            writeln!(out, "   line {}: {:?} - {}", row.line, row.input, message)?;
        }
    }

    if let Some(report_path) = report_path {
        let file = std::fs::File::create(report_path)
            .with_context(|| format!("Failed to create {}", report_path.display()))?;
        report.write_csv(file).context("Failed to write report")?;
        writeln!(out, "💾 Report written to {}", report_path.display())?;
    }

    Ok(report.invalid == 0)
}
