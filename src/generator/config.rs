use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::generator::GenerationError;
use crate::models::TransactionType;
use crate::types::{ClientId, Monetary};

/// How new transaction ids are rendered.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum IdStrategy {
    /// Random 128-bit ids drawn from the generator's RNG, rendered as UUID text.
    #[default]
    Uuid,
    /// `1`, `2`, `3`... for engines that expect integer transaction ids.
    Sequential
}

/// Relative weight of each transaction kind when picking the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionWeights {
    pub deposit: f64,
    pub withdrawal: f64,
    pub dispute: f64,
    pub resolve: f64,
    pub chargeback: f64
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            deposit: 2.0,
            withdrawal: 1.0,
            dispute: 1.0,
            resolve: 0.5,
            chargeback: 0.05
        }
    }
}

impl SelectionWeights {
    pub fn weight_of(&self, transaction_type: TransactionType) -> f64 {
        match transaction_type {
            TransactionType::Deposit => self.deposit,
            TransactionType::Withdrawal => self.withdrawal,
            TransactionType::Dispute => self.dispute,
            TransactionType::Resolve => self.resolve,
            TransactionType::Chargeback => self.chargeback
        }
    }

    /// Weights in `TransactionType::ALL` order.
    pub fn as_array(&self) -> [f64; 5] {
        TransactionType::ALL.map(|kind| self.weight_of(kind))
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if let Some(kind) = TransactionType::ALL.into_iter().find(|&kind| {
            let weight = self.weight_of(kind);
            !weight.is_finite() || weight < 0.0
        }) {
            return Err(GenerationError::InvalidWeights(format!("weight for {kind} must be a finite, non-negative number")));
        }

        if self.as_array().iter().sum::<f64>() <= 0.0 {
            return Err(GenerationError::InvalidWeights("at least one weight must be positive".to_string()));
        }

        Ok(())
    }
}

impl FromStr for SelectionWeights {
    type Err = GenerationError;

    /// Parses `deposit,withdrawal,dispute,resolve,chargeback`, e.g. `2,1,1,0.5,0.05`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value.split(',')
            .map(|part| part.trim().parse::<f64>()
                .map_err(|error| GenerationError::InvalidWeights(format!("'{}': {error}", part.trim()))))
            .collect::<Result<Vec<_>, _>>()?;

        let [deposit, withdrawal, dispute, resolve, chargeback] = parsed[..] else {
            return Err(GenerationError::InvalidWeights(format!("expected 5 comma separated weights, got {}", parsed.len())));
        };

        let weights = Self { deposit, withdrawal, dispute, resolve, chargeback };
        weights.validate()?;

        Ok(weights)
    }
}

impl Display for SelectionWeights {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{},{},{},{},{}", self.deposit, self.withdrawal, self.dispute, self.resolve, self.chargeback)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of transactions to generate.
    pub count: usize,
    /// Ceiling for a single deposit.
    pub max_amount: Monetary,
    /// Size of the client pool created up front. More clients are added on
    /// demand once every existing one is locked.
    pub initial_clients: ClientId,
    pub weights: SelectionWeights,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub id_strategy: IdStrategy
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100,
            max_amount: Monetary::from_cents(5_000_000),
            initial_clients: 2000,
            weights: SelectionWeights::default(),
            seed: None,
            id_strategy: IdStrategy::Uuid
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.max_amount.is_positive() {
            return Err(GenerationError::InvalidConfig(format!("maximum amount must be positive, got {}", self.max_amount)));
        }

        // A balance never exceeds the sum of every deposit in the run.
        let largest_balance = i64::try_from(self.count)
            .ok()
            .and_then(|count| count.checked_mul(self.max_amount.cents()));

        if largest_balance.is_none() {
            return Err(GenerationError::InvalidConfig(format!(
                "maximum amount {} over {} transactions could overflow an account balance",
                self.max_amount, self.count
            )));
        }

        self.weights.validate()
    }
}
