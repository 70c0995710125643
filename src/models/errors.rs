use crate::models::TransactionType;
use crate::types::{ClientId, Monetary};
use thiserror::Error;

/// A transaction effect whose preconditions do not hold for the target account.
///
/// The selector only ever applies eligible effects, so any of these reaching the
/// driver means the generated stream would be unsound and the run is aborted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account is locked for client [{account_id}], refusing [{transaction_type}]")]
    AccountLocked {
        account_id: ClientId,
        transaction_type: TransactionType
    },
    #[error("Amount [{amount}] must be positive for [{transaction_type}] on client [{account_id}]")]
    NonPositiveAmount {
        account_id: ClientId,
        transaction_type: TransactionType,
        amount: Monetary
    },
    #[error("Insufficient available funds for [{transaction_type}] of [{amount}] on client [{account_id}]")]
    InsufficientFunds {
        account_id: ClientId,
        transaction_type: TransactionType,
        amount: Monetary
    },
    #[error("Client [{account_id}] already has a dispute in progress")]
    DisputeInProgress {
        account_id: ClientId
    },
    #[error("Held amount [{held}] does not match [{amount}] for [{transaction_type}] on client [{account_id}]")]
    HeldMismatch {
        account_id: ClientId,
        transaction_type: TransactionType,
        amount: Monetary,
        held: Monetary
    },
    #[error("Numeric overflow occurred for [{transaction_type}] on client [{account_id}]")]
    Overflow {
        account_id: ClientId,
        transaction_type: TransactionType
    }
}

impl AccountError {
    pub fn account_locked(account_id: ClientId, transaction_type: TransactionType) -> Self {
        Self::AccountLocked { account_id, transaction_type }
    }

    pub fn non_positive_amount(account_id: ClientId, transaction_type: TransactionType, amount: Monetary) -> Self {
        Self::NonPositiveAmount { account_id, transaction_type, amount }
    }

    pub fn insufficient_funds(account_id: ClientId, transaction_type: TransactionType, amount: Monetary) -> Self {
        Self::InsufficientFunds { account_id, transaction_type, amount }
    }

    pub fn held_mismatch(account_id: ClientId, transaction_type: TransactionType, amount: Monetary, held: Monetary) -> Self {
        Self::HeldMismatch { account_id, transaction_type, amount, held }
    }

    pub fn overflow(account_id: ClientId, transaction_type: TransactionType) -> Self {
        Self::Overflow { account_id, transaction_type }
    }
}
