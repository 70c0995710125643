mod catalog;
mod errors;
mod ledger;
#[cfg(test)]
mod tests;

pub use catalog::{CatalogKind, TransactionCatalog};
pub use errors::LedgerError;
pub use ledger::Ledger;
