use thiserror::Error;

use crate::models::AccountError;
use crate::types::ClientId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Client [{0}] is not tracked by the ledger")]
    UnknownClient(ClientId),
    #[error("Client pool is exhausted, no id is left after [{0}]")]
    ClientPoolExhausted(ClientId),
    #[error(transparent)]
    Account(#[from] AccountError)
}
