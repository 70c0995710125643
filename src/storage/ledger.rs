use std::collections::BTreeMap;

use crate::models::{Account, ClientSnapshot, TransactionType};
use crate::storage::LedgerError;
use crate::types::{ClientId, Monetary};

/// In-memory client ledger the generated stream is kept consistent with.
///
/// Client ids are handed out in increasing order, so iterating the map by key
/// is the same as iterating in insertion order.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<ClientId, Account>
}

impl Ledger {
    #[cfg(test)]
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new()
        }
    }

    /// Creates a ledger pre-populated with default accounts `1..=size`.
    pub fn with_pool(size: ClientId) -> Self {
        Self {
            accounts: (1..=size).map(|account_id| (account_id, Account::new(account_id))).collect()
        }
    }

    /// Tracks a new default account and returns its id.
    pub fn add_client(&mut self) -> Result<ClientId, LedgerError> {
        let last = self.accounts.keys().next_back().copied().unwrap_or(0);
        let account_id = last.checked_add(1).ok_or(LedgerError::ClientPoolExhausted(last))?;

        self.accounts.insert(account_id, Account::new(account_id));

        Ok(account_id)
    }

    /// Applies one transaction effect to a tracked client.
    pub fn apply(&mut self, account_id: ClientId, transaction_type: TransactionType, amount: Monetary) -> Result<(), LedgerError> {
        let account = self.accounts.get_mut(&account_id)
            .ok_or(LedgerError::UnknownClient(account_id))?;

        account.apply(transaction_type, amount)?;

        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, account_id: ClientId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    pub fn snapshot(&self, account_id: ClientId) -> Option<ClientSnapshot> {
        self.accounts.get(&account_id).map(Account::snapshot)
    }

    pub fn is_unlocked(&self, account_id: ClientId) -> bool {
        self.accounts.get(&account_id).is_some_and(Account::is_unlocked)
    }

    pub fn client_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.accounts.keys().copied()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
