use serde::Serialize;

use crate::models::TransactionType;
use crate::types::{ClientId, Monetary, TransactionId};

/// A single row of the generated transaction log.
///
/// Dispute, resolve and chargeback rows carry the id of the deposit they
/// reference in `transaction_id` and leave `amount` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(rename = "client")]
    pub account_id: ClientId,
    #[serde(rename = "tx")]
    pub transaction_id: TransactionId,
    pub amount: Option<Monetary>
}

impl EmittedTransaction {
    pub const HEADER: [&'static str; 4] = ["type", "client", "tx", "amount"];

    pub fn with_amount(transaction_type: TransactionType, account_id: ClientId, transaction_id: TransactionId, amount: Monetary) -> Self {
        Self {
            transaction_type,
            account_id,
            transaction_id,
            amount: Some(amount)
        }
    }

    pub fn reference(transaction_type: TransactionType, account_id: ClientId, transaction_id: TransactionId) -> Self {
        Self {
            transaction_type,
            account_id,
            transaction_id,
            amount: None
        }
    }
}

/// Expected final state of one client, as written to the snapshot output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSnapshot {
    pub client: ClientId,
    pub available: Monetary,
    pub held: Monetary,
    pub total: Monetary,
    pub locked: bool
}

impl ClientSnapshot {
    pub const HEADER: [&'static str; 5] = ["client", "available", "held", "total", "locked"];

    pub fn is_default(&self) -> bool {
        self.available.is_zero() && self.held.is_zero() && self.total.is_zero() && !self.locked
    }
}
