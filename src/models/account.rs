use crate::models::errors::AccountError;
use crate::models::{ClientSnapshot, TransactionType};
use crate::types::{ClientId, Monetary};

/// Shadow state of a single client account.
///
/// `total` is stored rather than derived so that the snapshot reports exactly
/// what each effect did to it; `apply` keeps it equal to `available + held`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The unique identifier for the client.
    pub account_id: ClientId,
    /// Funds available for withdrawal.
    pub available: Monetary,
    /// Funds held by the open dispute, if any.
    pub held: Monetary,
    /// Sum of available and held funds.
    pub total: Monetary,
    /// Whether the account is frozen (due to a chargeback).
    pub locked: bool
}

impl Account {
    /// Creates a new, empty account for the given client ID.
    pub fn new(account_id: ClientId) -> Self {
        Self {
            account_id,
            available: Monetary::ZERO,
            held: Monetary::ZERO,
            total: Monetary::ZERO,
            locked: false
        }
    }

    /// Applies the effect of one transaction kind to the account.
    ///
    /// For dispute, resolve and chargeback `amount` is the amount of the
    /// referenced deposit. The account only models one open dispute at a time.
    ///
    /// # Errors
    /// Returns `AccountError` and leaves the account untouched if:
    /// - The account is locked.
    /// - The amount is not positive.
    /// - A withdrawal or dispute exceeds the available funds.
    /// - A dispute is opened while another one is in progress.
    /// - A resolve or chargeback does not match the held amount.
    pub fn apply(&mut self, transaction_type: TransactionType, amount: Monetary) -> Result<(), AccountError> {
        if self.locked {
            return Err(AccountError::account_locked(self.account_id, transaction_type))
        }

        if !amount.is_positive() {
            return Err(AccountError::non_positive_amount(self.account_id, transaction_type, amount))
        }

        match transaction_type {
            TransactionType::Deposit => self.deposit(amount),
            TransactionType::Withdrawal => self.withdrawal(amount),
            TransactionType::Dispute => self.dispute(amount),
            TransactionType::Resolve => self.resolve(amount),
            TransactionType::Chargeback => self.chargeback(amount)
        }
    }

    pub fn is_unlocked(&self) -> bool {
        !self.locked
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            client: self.account_id,
            available: self.available,
            held: self.held,
            total: self.total,
            locked: self.locked
        }
    }

    fn deposit(&mut self, amount: Monetary) -> Result<(), AccountError> {
        let kind = TransactionType::Deposit;
        let available = self.add(self.available, amount, kind)?;
        let total = self.add(self.total, amount, kind)?;

        self.available = available;
        self.total = total;

        Ok(())
    }

    fn withdrawal(&mut self, amount: Monetary) -> Result<(), AccountError> {
        let kind = TransactionType::Withdrawal;

        if self.available < amount {
            return Err(AccountError::insufficient_funds(self.account_id, kind, amount))
        }

        let available = self.sub(self.available, amount, kind)?;
        let total = self.sub(self.total, amount, kind)?;

        self.available = available;
        self.total = total;

        Ok(())
    }

    fn dispute(&mut self, amount: Monetary) -> Result<(), AccountError> {
        let kind = TransactionType::Dispute;

        if !self.held.is_zero() {
            return Err(AccountError::DisputeInProgress { account_id: self.account_id })
        }

        if self.available < amount {
            return Err(AccountError::insufficient_funds(self.account_id, kind, amount))
        }

        let available = self.sub(self.available, amount, kind)?;
        let held = self.add(self.held, amount, kind)?;

        self.available = available;
        self.held = held;

        Ok(())
    }

    fn resolve(&mut self, amount: Monetary) -> Result<(), AccountError> {
        let kind = TransactionType::Resolve;
        self.check_held(amount, kind)?;

        let available = self.add(self.available, amount, kind)?;

        self.available = available;
        self.held = Monetary::ZERO;

        Ok(())
    }

    fn chargeback(&mut self, amount: Monetary) -> Result<(), AccountError> {
        let kind = TransactionType::Chargeback;
        self.check_held(amount, kind)?;

        let total = self.sub(self.total, amount, kind)?;

        self.total = total;
        self.held = Monetary::ZERO;
        self.locked = true;

        Ok(())
    }

    fn check_held(&self, amount: Monetary, kind: TransactionType) -> Result<(), AccountError> {
        if self.held != amount {
            return Err(AccountError::held_mismatch(self.account_id, kind, amount, self.held))
        }

        Ok(())
    }

    fn add(&self, lhs: Monetary, rhs: Monetary, kind: TransactionType) -> Result<Monetary, AccountError> {
        lhs.checked_add(rhs).ok_or_else(|| AccountError::overflow(self.account_id, kind))
    }

    fn sub(&self, lhs: Monetary, rhs: Monetary, kind: TransactionType) -> Result<Monetary, AccountError> {
        lhs.checked_sub(rhs).ok_or_else(|| AccountError::overflow(self.account_id, kind))
    }
}
