use std::collections::HashMap;

use tracing::{debug, info};

use crate::generator::{GenerationError, GeneratorConfig, Selection, Selector};
use crate::models::{ClientSnapshot, EmittedTransaction, TransactionType};
use crate::output::{export_snapshots, RecordSink, StreamEmitter};
use crate::storage::{Ledger, TransactionCatalog};

const PROGRESS_INTERVAL: usize = 100_000;

/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub transactions: usize,
    pub by_type: HashMap<TransactionType, usize>,
    /// Steps where the drawn kind had no eligible target and a deposit was substituted.
    pub fallbacks: usize,
    /// Clients created after the initial pool because every client was locked.
    pub clients_created: usize,
    pub snapshots: usize
}

impl GenerationSummary {
    pub fn count_of(&self, transaction_type: TransactionType) -> usize {
        self.by_type.get(&transaction_type).copied().unwrap_or(0)
    }
}

/// Owns the shadow ledger, the catalog and the selector for one run.
pub struct FixtureGenerator {
    ledger: Ledger,
    catalog: TransactionCatalog,
    selector: Selector,
    count: usize,
    fallbacks: usize,
    clients_created: usize
}

impl FixtureGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        Ok(Self {
            ledger: Ledger::with_pool(config.initial_clients),
            catalog: TransactionCatalog::new(),
            selector: Selector::new(config)?,
            count: config.count,
            fallbacks: 0,
            clients_created: 0
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn catalog(&self) -> &TransactionCatalog {
        &self.catalog
    }

    /// Generates exactly one transaction and applies it to the ledger.
    ///
    /// A drawn kind with no eligible target is replaced by a deposit, and a
    /// deposit with no unlocked client goes to a newly created one, so every
    /// call yields a row.
    pub fn step(&mut self) -> Result<EmittedTransaction, GenerationError> {
        let transaction_type = self.selector.pick_kind();

        match self.selector.select(transaction_type, &mut self.ledger, &mut self.catalog)? {
            Selection::Applied(transaction) => Ok(transaction),
            Selection::NoEligibleTarget(reason) => {
                debug!("No target for [{transaction_type}] ({reason}), substituting a deposit");
                self.fallbacks += 1;
                self.fallback_deposit()
            }
            Selection::NeedsNewClient => self.deposit_to_new_client()
        }
    }

    /// Runs the configured number of steps, then exports the expected account states.
    pub fn run<T, S>(&mut self, transactions: &mut T, snapshots: &mut S) -> Result<GenerationSummary, GenerationError>
    where
        T: RecordSink<EmittedTransaction>,
        S: RecordSink<ClientSnapshot>
    {
        let mut emitter = StreamEmitter::new(transactions);
        let mut by_type = HashMap::new();

        for _ in 0..self.count {
            let transaction = self.step()?;
            emitter.emit(&transaction)?;
            *by_type.entry(transaction.transaction_type).or_insert(0) += 1;

            if emitter.emitted() % PROGRESS_INTERVAL == 0 {
                info!("Generated {} of {} transactions", emitter.emitted(), self.count);
            }
        }

        let transactions = emitter.finish()?;
        let snapshots = export_snapshots(&self.ledger, snapshots)?;

        Ok(GenerationSummary {
            transactions,
            by_type,
            fallbacks: self.fallbacks,
            clients_created: self.clients_created,
            snapshots
        })
    }

    fn fallback_deposit(&mut self) -> Result<EmittedTransaction, GenerationError> {
        match self.selector.deposit(&mut self.ledger, &mut self.catalog)? {
            Selection::Applied(transaction) => Ok(transaction),
            Selection::NoEligibleTarget(_) | Selection::NeedsNewClient => self.deposit_to_new_client()
        }
    }

    fn deposit_to_new_client(&mut self) -> Result<EmittedTransaction, GenerationError> {
        let account_id = self.ledger.add_client()?;
        self.clients_created += 1;
        debug!("All clients are locked, created client [{account_id}]");

        self.selector.deposit_into(account_id, &mut self.ledger, &mut self.catalog)
    }
}
