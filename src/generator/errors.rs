use thiserror::Error;

use crate::output::OutputError;
use crate::storage::LedgerError;

/// Why a selection could not target anyone. The driver recovers from both by
/// substituting a deposit.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no eligible client")]
    NoEligibleClient,
    #[error("no matching deposit found")]
    NoMatchingDepositFound
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid selection weights: {0}")]
    InvalidWeights(String),
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Output(#[from] OutputError)
}
