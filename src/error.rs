// ⚠️ Error Types - Typed failures for decoding and catalogue loading
//
// Every decode failure is caused by the input, never transient.
// Callers branch on the variant instead of parsing messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// DECODE ERRORS
// ============================================================================

/// Why an input failed the shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Wrong number of characters
    Length { expected: usize, actual: usize },

    /// A character other than an ASCII digit (0-indexed character position)
    NonDigit { position: usize, found: char },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::Length { expected, actual } => {
                write!(f, "expected {} digits, got {} characters", expected, actual)
            }
            MalformedReason::NonDigit { position, found } => {
                write!(f, "non-digit character {:?} at position {}", found, position)
            }
        }
    }
}

/// Failure to decode a CLABE
///
/// The gates are checked in order (shape, bank, checksum) and the first
/// failure wins, so exactly one variant describes a rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed CLABE: {0}")]
    MalformedInput(MalformedReason),

    #[error("unknown bank code {code}")]
    UnknownBankCode { code: String },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: char, actual: char },
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MalformedInput(_) => DecodeErrorKind::MalformedInput,
            DecodeError::UnknownBankCode { .. } => DecodeErrorKind::UnknownBankCode,
            DecodeError::ChecksumMismatch { .. } => DecodeErrorKind::ChecksumMismatch,
        }
    }
}

/// Payload-free tag of a [`DecodeError`], used for reports and API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorKind {
    MalformedInput,
    UnknownBankCode,
    ChecksumMismatch,
}

impl DecodeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeErrorKind::MalformedInput => "malformed_input",
            DecodeErrorKind::UnknownBankCode => "unknown_bank_code",
            DecodeErrorKind::ChecksumMismatch => "checksum_mismatch",
        }
    }
}

// ============================================================================
// REGISTRY ERRORS
// ============================================================================

/// Failure to build a bank registry from caller-supplied data
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid bank code {code:?}: must be exactly 3 ASCII digits")]
    InvalidCode { code: String },

    #[error("duplicate bank code {code}")]
    DuplicateCode { code: String },

    #[error("failed to read bank catalogue: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open bank catalogue: {0}")]
    Io(#[from] std::io::Error),
}
