use std::collections::{HashMap, HashSet};

use crate::types::{ClientId, Monetary, TransactionId};

/// The kinds of transaction that are recorded in the catalog.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CatalogKind {
    Deposit,
    Withdrawal
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub transaction_id: TransactionId,
    pub account_id: ClientId,
    pub amount: Monetary,
    pub kind: CatalogKind
}

/// Append-only history of generated deposits and withdrawals.
///
/// Entries are never removed. Dispute progress is tracked next to them so a
/// deposit is disputed at most once, and a resolve or chargeback always points
/// at the deposit whose dispute is still open.
#[derive(Debug, Default)]
pub struct TransactionCatalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<TransactionId, usize>,
    by_client: HashMap<ClientId, Vec<usize>>,
    disputed: HashSet<TransactionId>,
    settled: HashSet<TransactionId>
}

impl TransactionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. A repeated id keeps the first entry.
    pub fn record(&mut self, transaction_id: TransactionId, account_id: ClientId, amount: Monetary, kind: CatalogKind) {
        if self.by_id.contains_key(&transaction_id) {
            return;
        }

        let index = self.entries.len();

        self.by_id.insert(transaction_id.clone(), index);
        self.by_client.entry(account_id).or_default().push(index);
        self.entries.push(CatalogEntry {
            transaction_id,
            account_id,
            amount,
            kind
        });
    }

    /// Returns the oldest undisputed deposit of the client whose amount is
    /// strictly below `ceiling`.
    pub fn find_deposit_under(&self, account_id: ClientId, ceiling: Monetary) -> Option<(Monetary, TransactionId)> {
        self.deposits_of(account_id)
            .find(|entry| entry.amount < ceiling && !self.disputed.contains(&entry.transaction_id))
            .map(|entry| (entry.amount, entry.transaction_id.clone()))
    }

    /// Returns the client's deposit under open dispute whose amount equals `target`.
    pub fn find_deposit_equal(&self, account_id: ClientId, target: Monetary) -> Option<TransactionId> {
        self.deposits_of(account_id)
            .find(|entry| entry.amount == target && self.is_open_dispute(&entry.transaction_id))
            .map(|entry| entry.transaction_id.clone())
    }

    pub fn mark_disputed(&mut self, transaction_id: &str) {
        self.disputed.insert(transaction_id.to_string());
    }

    pub fn mark_settled(&mut self, transaction_id: &str) {
        self.settled.insert(transaction_id.to_string());
    }

    pub fn is_open_dispute(&self, transaction_id: &str) -> bool {
        self.disputed.contains(transaction_id) && !self.settled.contains(transaction_id)
    }

    #[cfg(test)]
    pub fn get(&self, transaction_id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(transaction_id).map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn deposits_of(&self, account_id: ClientId) -> impl Iterator<Item = &CatalogEntry> {
        self.by_client.get(&account_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.entries[index])
            .filter(|entry| entry.kind == CatalogKind::Deposit)
    }
}
