use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::generator::{GenerationError, GeneratorConfig, IdStrategy, SelectionError};
use crate::models::{EmittedTransaction, TransactionType};
use crate::storage::{CatalogKind, Ledger, TransactionCatalog};
use crate::types::{ClientId, Monetary, TransactionId};

/// Outcome of trying to generate one transaction of a given kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The effect was applied to the ledger and the row is ready to emit.
    Applied(EmittedTransaction),
    /// Nothing in the current state allows this kind; nothing was changed.
    NoEligibleTarget(SelectionError),
    /// Every tracked client is locked, so a deposit has nowhere to go.
    NeedsNewClient
}

/// Randomized policy that picks the next transaction and applies it.
///
/// The selector owns the RNG and id counter but not the ledger or catalog;
/// those are passed in by the driver that owns them.
pub struct Selector {
    rng: StdRng,
    kinds: WeightedIndex<f64>,
    max_amount: Monetary,
    id_strategy: IdStrategy,
    next_sequential_id: u64
}

impl Selector {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;

        let kinds = WeightedIndex::new(config.weights.as_array())
            .map_err(|error| GenerationError::InvalidWeights(error.to_string()))?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };

        Ok(Self {
            rng,
            kinds,
            max_amount: config.max_amount,
            id_strategy: config.id_strategy,
            next_sequential_id: 1
        })
    }

    /// Draws the next transaction kind from the weight table.
    pub fn pick_kind(&mut self) -> TransactionType {
        TransactionType::ALL[self.kinds.sample(&mut self.rng)]
    }

    /// Tries to generate one transaction of `transaction_type`.
    ///
    /// # Errors
    /// Only returns an error if an eligible target turns out to violate a ledger
    /// precondition, which would make the stream unsound.
    pub fn select(&mut self, transaction_type: TransactionType, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<Selection, GenerationError> {
        match transaction_type {
            TransactionType::Deposit => self.deposit(ledger, catalog),
            TransactionType::Withdrawal => self.withdrawal(ledger, catalog),
            TransactionType::Dispute => self.dispute(ledger, catalog),
            TransactionType::Resolve | TransactionType::Chargeback => self.settle(transaction_type, ledger, catalog)
        }
    }

    /// Deposits into a random unlocked client.
    pub fn deposit(&mut self, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<Selection, GenerationError> {
        let Some(account_id) = ledger.client_ids()
            .filter(|&account_id| ledger.is_unlocked(account_id))
            .choose(&mut self.rng) else {
            return Ok(Selection::NeedsNewClient);
        };

        self.deposit_into(account_id, ledger, catalog).map(Selection::Applied)
    }

    /// Deposits a random amount into a specific client.
    pub fn deposit_into(&mut self, account_id: ClientId, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<EmittedTransaction, GenerationError> {
        let ceiling = self.max_amount.cents();
        let floor = Monetary::ONE.cents().min(ceiling);
        let amount = Monetary::from_cents(self.rng.gen_range(floor..=ceiling));

        ledger.apply(account_id, TransactionType::Deposit, amount)?;

        let transaction_id = self.next_transaction_id();
        catalog.record(transaction_id.clone(), account_id, amount, CatalogKind::Deposit);

        Ok(EmittedTransaction::with_amount(TransactionType::Deposit, account_id, transaction_id, amount))
    }

    fn withdrawal(&mut self, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<Selection, GenerationError> {
        // A withdrawal stays strictly between zero and the available balance,
        // so the client needs at least two cents to be eligible.
        let Some((account_id, available)) = ledger.accounts()
            .filter(|account| account.is_unlocked() && account.available.cents() >= 2)
            .map(|account| (account.account_id, account.available))
            .choose(&mut self.rng) else {
            return Ok(Selection::NoEligibleTarget(SelectionError::NoEligibleClient));
        };

        let amount = Monetary::from_cents(self.rng.gen_range(1..available.cents()));

        ledger.apply(account_id, TransactionType::Withdrawal, amount)?;

        let transaction_id = self.next_transaction_id();
        catalog.record(transaction_id.clone(), account_id, amount, CatalogKind::Withdrawal);

        Ok(Selection::Applied(EmittedTransaction::with_amount(TransactionType::Withdrawal, account_id, transaction_id, amount)))
    }

    fn dispute(&mut self, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<Selection, GenerationError> {
        let Some((account_id, available)) = ledger.accounts()
            .filter(|account| account.is_unlocked() && account.held.is_zero() && account.available.is_positive())
            .map(|account| (account.account_id, account.available))
            .choose(&mut self.rng) else {
            return Ok(Selection::NoEligibleTarget(SelectionError::NoEligibleClient));
        };

        let Some((amount, transaction_id)) = catalog.find_deposit_under(account_id, available) else {
            return Ok(Selection::NoEligibleTarget(SelectionError::NoMatchingDepositFound));
        };

        ledger.apply(account_id, TransactionType::Dispute, amount)?;
        catalog.mark_disputed(&transaction_id);

        Ok(Selection::Applied(EmittedTransaction::reference(TransactionType::Dispute, account_id, transaction_id)))
    }

    /// Resolve and chargeback share the target search: a client with held
    /// funds, and the open disputed deposit that accounts for them.
    fn settle(&mut self, transaction_type: TransactionType, ledger: &mut Ledger, catalog: &mut TransactionCatalog) -> Result<Selection, GenerationError> {
        let Some((account_id, held)) = ledger.accounts()
            .filter(|account| account.is_unlocked() && account.held.is_positive())
            .map(|account| (account.account_id, account.held))
            .choose(&mut self.rng) else {
            return Ok(Selection::NoEligibleTarget(SelectionError::NoEligibleClient));
        };

        let Some(transaction_id) = catalog.find_deposit_equal(account_id, held) else {
            return Ok(Selection::NoEligibleTarget(SelectionError::NoMatchingDepositFound));
        };

        ledger.apply(account_id, transaction_type, held)?;
        catalog.mark_settled(&transaction_id);

        Ok(Selection::Applied(EmittedTransaction::reference(transaction_type, account_id, transaction_id)))
    }

    fn next_transaction_id(&mut self) -> TransactionId {
        match self.id_strategy {
            IdStrategy::Uuid => Builder::from_random_bytes(self.rng.r#gen()).into_uuid().to_string(),
            IdStrategy::Sequential => {
                let id = self.next_sequential_id;
                self.next_sequential_id += 1;
                id.to_string()
            }
        }
    }
}
