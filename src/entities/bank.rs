// 🏦 Bank Entity - Mexican bank catalogue
//
// In Mexico every banking institution is identified by a three-digit code.
// The embedded table follows the SAT bank catalogue
// (https://www.gob.mx/sat/documentos/catalogo-de-bancos).
//
// The catalogue is static data: the registry is built once on first use and
// never mutated afterwards, so it can be shared across threads without locks.

use crate::clabe::{self, Clabe};
use crate::error::{DecodeError, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Where the embedded [`CATALOGUE`] was taken from
pub const CATALOGUE_SOURCE: &str = "https://www.gob.mx/sat/documentos/catalogo-de-bancos";

/// Embedded SAT bank catalogue, ordered by code
pub const CATALOGUE: &[(&str, &str)] = &[
    ("001", "BANXICO"),
    ("002", "BANAMEX"),
    ("006", "BANCOMEXT"),
    ("009", "BANOBRAS"),
    ("012", "BBVA MEXICO"),
    ("014", "SANTANDER"),
    ("019", "BANJERCITO"),
    ("021", "HSBC"),
    ("030", "BAJIO"),
    ("036", "INBURSA"),
    ("042", "MIFEL"),
    ("044", "SCOTIABANK"),
    ("058", "BANREGIO"),
    ("059", "INVEX"),
    ("060", "BANSI"),
    ("062", "AFIRME"),
    ("072", "BANORTE"),
    ("106", "BANK OF AMERICA"),
    ("108", "MUFG"),
    ("110", "JP MORGAN"),
    ("112", "BMONEX"),
    ("113", "VE POR MAS"),
    ("126", "CREDIT SUISSE"),
    ("127", "AZTECA"),
    ("128", "AUTOFIN"),
    ("129", "BARCLAYS"),
    ("130", "COMPARTAMOS"),
    ("132", "MULTIVA BANCO"),
    ("133", "ACTINVER"),
    ("135", "NAFIN"),
    ("136", "INTERCAM BANCO"),
    ("137", "BANCOPPEL"),
    ("138", "ABC CAPITAL"),
    ("140", "CONSUBANCO"),
    ("141", "VOLKSWAGEN"),
    ("143", "CIBANCO"),
    ("145", "BBASE"),
    ("147", "BANKAOOL"),
    ("148", "PAGATODO"),
    ("150", "INMOBILIARIO"),
    ("151", "DONDE"),
    ("152", "BANCREA"),
    ("154", "BANCO COVALTO"),
    ("155", "ICBC"),
    ("156", "SABADELL"),
    ("157", "SHINHAN"),
    ("158", "MIZUHO BANK"),
    ("159", "BANK OF CHINA"),
    ("160", "BANCO S3"),
    ("166", "BaBien"),
    ("168", "HIPOTECARIA FED"),
    ("600", "MONEXCB"),
    ("601", "GBM"),
    ("602", "MASARI"),
    ("605", "VALUE"),
    ("608", "VECTOR"),
    ("613", "MULTIVA CBOLSA"),
    ("616", "FINAMEX"),
    ("617", "VALMEX"),
    ("620", "PROFUTURO"),
    ("630", "CB INTERCAM"),
    ("631", "CI BOLSA"),
    ("634", "FINCOMUN"),
    ("638", "NU MEXICO"),
    ("646", "STP"),
    ("648", "TACTIV CB"),
    ("652", "CREDICAPITAL"),
    ("653", "KUSPIT"),
    ("656", "UNAGRA"),
    ("659", "ASP INTEGRA OPC"),
    ("661", "ALTERNATIVOS"),
    ("670", "LIBERTAD"),
    ("677", "CAJA POP MEXICA"),
    ("680", "CRISTOBAL COLON"),
    ("683", "CAJA TELEFONIST"),
    ("684", "OPM"),
    ("685", "FONDO (FIRA)"),
    ("686", "INVERCAP"),
    ("688", "CREDICLUB"),
    ("689", "FOMPED"),
    ("703", "TESORED"),
    ("706", "ARCUS"),
    ("710", "NVIO"),
];

// ============================================================================
// BANK ENTITY
// ============================================================================

/// A banking institution: three-digit code plus display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bank {
    /// Three ASCII digits, unique within a registry
    pub code: String,

    /// Display name as published in the catalogue
    pub name: String,
}

impl Bank {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Bank {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Case-insensitive substring match on the display name
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// BANK REGISTRY
// ============================================================================

/// Read-only code → bank mapping
///
/// Keeps the banks in their original order for enumeration, plus a hash
/// index for exact lookups. Once built it is never mutated.
#[derive(Debug, Clone)]
pub struct BankRegistry {
    banks: Vec<Bank>,
    index: HashMap<String, usize>,
}

impl BankRegistry {
    /// Registry over the embedded SAT catalogue
    pub fn catalogue() -> Self {
        let banks: Vec<Bank> = CATALOGUE
            .iter()
            .map(|(code, name)| Bank::new(*code, *name))
            .collect();
        let index = banks
            .iter()
            .enumerate()
            .map(|(i, bank)| (bank.code.clone(), i))
            .collect();

        BankRegistry { banks, index }
    }

    /// Build a registry from caller-supplied banks
    ///
    /// Every code must be exactly 3 ASCII digits and codes must be unique.
    /// Order is preserved.
    pub fn from_banks<I>(banks: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Bank>,
    {
        let mut registry = BankRegistry {
            banks: Vec::new(),
            index: HashMap::new(),
        };

        for bank in banks {
            if !is_valid_code(&bank.code) {
                return Err(RegistryError::InvalidCode { code: bank.code });
            }
            if registry.index.contains_key(&bank.code) {
                return Err(RegistryError::DuplicateCode { code: bank.code });
            }
            registry.index.insert(bank.code.clone(), registry.banks.len());
            registry.banks.push(bank);
        }

        Ok(registry)
    }

    /// Load a registry from CSV with a `code,name` header row
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let banks = rdr
            .deserialize::<Bank>()
            .collect::<Result<Vec<_>, csv::Error>>()?;

        Self::from_banks(banks)
    }

    /// Load a registry from a CSV file on disk
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Exact lookup by code; `None` for any code not in the table
    pub fn lookup(&self, code: &str) -> Option<&Bank> {
        self.index.get(code).map(|&i| &self.banks[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// All banks in table order
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    /// Banks whose name contains `query` (case-insensitive), in table order
    pub fn find_by_name(&self, query: &str) -> Vec<&Bank> {
        self.banks.iter().filter(|b| b.matches(query)).collect()
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Decode a CLABE against this registry
    pub fn decode(&self, input: &str) -> Result<Clabe, DecodeError> {
        clabe::decode_with(input, self)
    }
}

impl Default for BankRegistry {
    fn default() -> Self {
        Self::catalogue()
    }
}

// ============================================================================
// PROCESS-WIDE REGISTRY
// ============================================================================

static REGISTRY: OnceLock<BankRegistry> = OnceLock::new();

/// The embedded catalogue, built on first use
pub fn registry() -> &'static BankRegistry {
    REGISTRY.get_or_init(BankRegistry::catalogue)
}

/// Exact lookup against the embedded catalogue
pub fn lookup(code: &str) -> Option<&'static Bank> {
    registry().lookup(code)
}

/// All banks of the embedded catalogue in table order
pub fn banks() -> &'static [Bank] {
    registry().banks()
}

// ============================================================================
// TESTS
// ============================================================================
