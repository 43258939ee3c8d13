// 🔢 CLABE Decoder - Shape, bank and checksum validation
//
// CLABE (Clave Bancaria Estandarizada) is the 18-digit account number used
// for interbank transfers in Mexico:
//
//   BBB PPP AAAAAAAAAAA C
//   │   │   │           └ check digit
//   │   │   └ account number (11)
//   │   └ plaza code (3)
//   └ bank code (3)
//
// See https://en.wikipedia.org/wiki/CLABE#Structure

use crate::entities::bank::{self, Bank, BankRegistry};
use crate::error::{DecodeError, MalformedReason};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const CLABE_LENGTH: usize = 18;

/// Number of leading digits covered by the checksum
pub const CHECKSUM_INPUT_LENGTH: usize = 17;

/// The nth digit is weighted by `WEIGHTS[n % 3]`
const WEIGHTS: [u32; 3] = [3, 7, 1];

// ============================================================================
// CLABE VALUE
// ============================================================================

/// A decoded, validated CLABE
///
/// Only [`decode`] (or [`BankRegistry::decode`]) can build one, so every
/// instance has passed the shape, bank and checksum checks. The structural
/// fields are slices of the raw value, which keeps
/// `raw == bank.code + plaza + account + check` true by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clabe {
    raw: String,
    bank: Bank,
}

impl Clabe {
    /// The original 18-digit string
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn bank_code(&self) -> &str {
        &self.raw[0..3]
    }

    /// Branch / locale code
    pub fn plaza_code(&self) -> &str {
        &self.raw[3..6]
    }

    pub fn account_number(&self) -> &str {
        &self.raw[6..17]
    }

    pub fn check_digit(&self) -> &str {
        &self.raw[17..]
    }

    /// Structured view for JSON output
    pub fn to_record(&self) -> ClabeRecord {
        ClabeRecord {
            raw_value: self.raw.clone(),
            bank: self.bank.clone(),
            plaza_code: self.plaza_code().to_string(),
            account_number: self.account_number().to_string(),
            check_digit: self.check_digit().to_string(),
        }
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

/// Decomposed CLABE fields, as exposed by the CLI and the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClabeRecord {
    pub raw_value: String,
    pub bank: Bank,
    pub plaza_code: String,
    pub account_number: String,
    pub check_digit: String,
}

impl From<&Clabe> for ClabeRecord {
    fn from(clabe: &Clabe) -> Self {
        clabe.to_record()
    }
}

// ============================================================================
// DECODING
// ============================================================================

/// Decode against the embedded bank catalogue
pub fn decode(input: &str) -> Result<Clabe, DecodeError> {
    decode_with(input, bank::registry())
}

/// Decode against a specific registry
pub fn decode_with(input: &str, registry: &BankRegistry) -> Result<Clabe, DecodeError> {
    let digits = parse_digits(input, CLABE_LENGTH)?;

    let code = &input[0..3];
    let bank = registry
        .lookup(code)
        .ok_or_else(|| DecodeError::UnknownBankCode {
            code: code.to_string(),
        })?;

    let expected = checksum_digit(&digits[..CHECKSUM_INPUT_LENGTH]);
    let actual = digits[CHECKSUM_INPUT_LENGTH];
    if expected != actual {
        return Err(DecodeError::ChecksumMismatch {
            expected: to_char(expected),
            actual: to_char(actual),
        });
    }

    Ok(Clabe {
        raw: input.to_string(),
        bank: bank.clone(),
    })
}

/// True when `input` decodes against the embedded catalogue
pub fn is_valid(input: &str) -> bool {
    decode(input).is_ok()
}

// ============================================================================
// CHECKSUM
// ============================================================================

/// Compute the check digit for the first 17 digits of a CLABE
///
/// `first17` must be exactly 17 ASCII digits. The result is always a single
/// character `'0'..='9'`.
pub fn compute_checksum(first17: &str) -> Result<char, DecodeError> {
    let digits = parse_digits(first17, CHECKSUM_INPUT_LENGTH)?;
    Ok(to_char(checksum_digit(&digits)))
}

/// Weighted sum of the per-position "ones" digits, then (10 - sum % 10) % 10
fn checksum_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| (d * WEIGHTS[i % WEIGHTS.len()]) % 10)
        .sum();

    // 10 wraps to 0
    (10 - sum % 10) % 10
}

/// Shape check: exactly `expected` characters, all ASCII digits
fn parse_digits(input: &str, expected: usize) -> Result<Vec<u32>, DecodeError> {
    let actual = input.chars().count();
    if actual != expected {
        return Err(DecodeError::MalformedInput(MalformedReason::Length {
            expected,
            actual,
        }));
    }

    input
        .chars()
        .enumerate()
        .map(|(position, c)| {
            if c.is_ascii_digit() {
                Ok(c as u32 - '0' as u32)
            } else {
                Err(DecodeError::MalformedInput(MalformedReason::NonDigit {
                    position,
                    found: c,
                }))
            }
        })
        .collect()
}

fn to_char(digit: u32) -> char {
    char::from(b'0' + digit as u8)
}

// ============================================================================
// TEXT ROUND-TRIP
// ============================================================================

impl fmt::Display for Clabe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Clabe {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Clabe {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl TryFrom<&str> for Clabe {
    type Error = DecodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        decode(value)
    }
}

impl TryFrom<String> for Clabe {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode(&value)
    }
}

impl From<Clabe> for String {
    fn from(clabe: Clabe) -> Self {
        clabe.raw
    }
}

impl Serialize for Clabe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Clabe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn test_decode_valid_vectors() {
        let vectors = [
            ("140180009000015533", "140", "CONSUBANCO", "180", "00900001553", "3"),
            ("002010077777777771", "002", "BANAMEX", "010", "07777777777", "1"),
            ("014027000005555558", "014", "SANTANDER", "027", "00000555555", "8"),
        ];

        for (input, code, name, plaza, account, check) in vectors {
            let clabe = decode(input).unwrap();
            assert_eq!(clabe.bank().code, code);
            assert_eq!(clabe.bank().name, name);
            assert_eq!(clabe.bank_code(), code);
            assert_eq!(clabe.plaza_code(), plaza);
            assert_eq!(clabe.account_number(), account);
            assert_eq!(clabe.check_digit(), check);
            assert_eq!(clabe.raw_value(), input);
        }
    }

    #[test]
    fn test_decode_checksum_wraps_to_zero() {
        // Weighted sum is 20, so 10 - 0 = 10 collapses to 0
        assert_eq!(compute_checksum("01218000000000006").unwrap(), '0');

        let clabe = decode("012180000000000060").unwrap();
        assert_eq!(clabe.bank().name, "BBVA MEXICO");
        assert_eq!(clabe.check_digit(), "0");
    }

    #[test]
    fn test_decode_malformed() {
        for input in ["", "7invalid_clabe7", "THIS_IS_18_LETTERS"] {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind(), DecodeErrorKind::MalformedInput, "input {:?}", input);
        }
    }

    #[test]
    fn test_decode_malformed_reasons() {
        assert_eq!(
            decode("").unwrap_err(),
            DecodeError::MalformedInput(MalformedReason::Length { expected: 18, actual: 0 })
        );
        assert_eq!(
            decode("THIS_IS_18_LETTERS").unwrap_err(),
            DecodeError::MalformedInput(MalformedReason::NonDigit { position: 0, found: 'T' })
        );
        assert_eq!(
            decode("00201007777777777 ").unwrap_err(),
            DecodeError::MalformedInput(MalformedReason::NonDigit { position: 17, found: ' ' })
        );
        assert_eq!(
            decode("0020100777777777771").unwrap_err(),
            DecodeError::MalformedInput(MalformedReason::Length { expected: 18, actual: 19 })
        );
    }

    #[test]
    fn test_decode_rejects_separators_and_unicode_digits() {
        assert!(decode("002-010-07777777777-1").is_err());
        assert!(decode("002 010 07777777777 1").is_err());
        // Arabic-Indic digit in the last position: 18 chars but not ASCII
        let err = decode("00201007777777777٣").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedInput);
    }

    #[test]
    fn test_decode_unknown_bank() {
        assert_eq!(
            decode("999180009000015533").unwrap_err(),
            DecodeError::UnknownBankCode { code: "999".to_string() }
        );
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        assert_eq!(
            decode("002010077777777779").unwrap_err(),
            DecodeError::ChecksumMismatch { expected: '1', actual: '9' }
        );
    }

    #[test]
    fn test_bank_is_checked_before_checksum() {
        // Unknown bank with a bad check digit still reports the bank
        let err = decode("999180009000015530").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnknownBankCode);
    }

    #[test]
    fn test_compute_checksum() {
        assert_eq!(compute_checksum("14018000900001553").unwrap(), '3');
        assert_eq!(compute_checksum("00201007777777777").unwrap(), '1');
        assert_eq!(compute_checksum("01402700000555555").unwrap(), '8');
        assert_eq!(compute_checksum("00000000000000000").unwrap(), '0');
    }

    #[test]
    fn test_compute_checksum_requires_17_digits() {
        assert!(matches!(
            compute_checksum("140180009000015533"),
            Err(DecodeError::MalformedInput(MalformedReason::Length { expected: 17, actual: 18 }))
        ));
        assert!(matches!(
            compute_checksum("1401800090000155x"),
            Err(DecodeError::MalformedInput(MalformedReason::NonDigit { position: 16, found: 'x' }))
        ));
    }

    #[test]
    fn test_decode_with_custom_registry() {
        let registry = BankRegistry::from_banks(vec![Bank::new("999", "TEST BANK")]).unwrap();

        let clabe = decode_with("999180009000015535", &registry).unwrap();
        assert_eq!(clabe.bank().name, "TEST BANK");

        // BANAMEX is absent from the custom table
        assert_eq!(
            registry.decode("002010077777777771").unwrap_err().kind(),
            DecodeErrorKind::UnknownBankCode
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("002010077777777771"));
        assert!(!is_valid("002010077777777779"));
    }

    #[test]
    fn test_text_round_trip() {
        let clabe: Clabe = "014027000005555558".parse().unwrap();
        assert_eq!(clabe.to_string(), "014027000005555558");
        assert_eq!(clabe.as_ref(), "014027000005555558");

        let again = Clabe::try_from(clabe.to_string()).unwrap();
        assert_eq!(again, clabe);

        let raw: String = again.into();
        assert_eq!(raw, "014027000005555558");
    }

    #[test]
    fn test_serde_round_trip() {
        let clabe = decode("140180009000015533").unwrap();

        let json = serde_json::to_string(&clabe).unwrap();
        assert_eq!(json, "\"140180009000015533\"");

        let back: Clabe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clabe);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let err = serde_json::from_str::<Clabe>("\"002010077777777779\"").unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));

        assert!(serde_json::from_str::<Clabe>("18").is_err());
    }

    #[test]
    fn test_to_record() {
        let record = decode("002010077777777771").unwrap().to_record();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "raw_value": "002010077777777771",
                "bank": {"code": "002", "name": "BANAMEX"},
                "plaza_code": "010",
                "account_number": "07777777777",
                "check_digit": "1",
            })
        );
    }
}
