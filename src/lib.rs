// mx-clabe - Core Library
// CLABE validation and decoding, exposed for the CLI, the API server, and tests

pub mod clabe;
pub mod entities;
pub mod error;
pub mod batch;
pub mod config;
pub mod cli;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use clabe::{
    Clabe, ClabeRecord,
    decode, decode_with, compute_checksum, is_valid,
    CLABE_LENGTH, CHECKSUM_INPUT_LENGTH,
};
pub use entities::{Bank, BankRegistry, CATALOGUE, CATALOGUE_SOURCE, banks, lookup, registry};
pub use error::{DecodeError, DecodeErrorKind, MalformedReason, RegistryError};
pub use batch::{BatchError, BatchReport, BatchRow, RowOutcome, validate_csv, validate_csv_path};
pub use config::{Config, ConfigError};
