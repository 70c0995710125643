use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::ClientId;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Client [{client}] field [{field}] expected [{expected}] but found [{actual}]")]
    Mismatch {
        client: ClientId,
        field: &'static str,
        expected: String,
        actual: String
    },
    #[error("Client [{0}] is missing from the actual output")]
    MissingClient(ClientId),
    #[error("Client [{client}] is only in the actual output and is not in its default state (available [{available}], locked [{locked}])")]
    UnexpectedClient {
        client: ClientId,
        available: Decimal,
        locked: bool
    },
    #[error("Client [{0}] appears more than once in {1}")]
    DuplicateClient(ClientId, &'static str),
    #[error("Invalid value [{value}] for field [{field}] of client [{client}] in {}", .path.display())]
    InvalidValue {
        path: PathBuf,
        client: ClientId,
        field: &'static str,
        value: String
    },
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: csv::Error
    },
    #[error("Loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError)
}
