// Entity Models
// Reference data consumed by the decoder

pub mod bank;

pub use bank::{Bank, BankRegistry, CATALOGUE, CATALOGUE_SOURCE, banks, lookup, registry};
