use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::types::ClientId;
use crate::verify::VerificationError;

/// Raw account row as found in either file; values are parsed afterwards so
/// that a bad value can be reported with its client and field.
#[derive(Debug, Deserialize)]
struct AccountRow {
    client: ClientId,
    available: String,
    held: String,
    total: String,
    locked: String
}

/// One client's state, read from the expected snapshot or an engine's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub client: ClientId,
    pub available: Decimal,
    pub held: Decimal,
    pub total: Decimal,
    pub locked: bool
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Expected clients that were found and matched.
    pub clients_checked: usize,
    /// Clients only present in the actual output, all in their default state.
    pub extra_clients: usize
}

/// Loads both files on the blocking pool and compares them.
pub async fn verify_files(expected: PathBuf, actual: PathBuf) -> Result<VerificationReport, VerificationError> {
    let expected_task = spawn_blocking(move || load_accounts(&expected));
    let actual_task = spawn_blocking(move || load_accounts(&actual));

    let (expected, actual) = tokio::try_join!(expected_task, actual_task)?;

    compare(&expected?, &actual?)
}

/// Reads a `client,available,held,total,locked` file.
///
/// `locked` may be `true`/`false` in any case, or `1`/`0` as stored by
/// database-backed engines.
pub fn load_accounts(path: &Path) -> Result<Vec<AccountState>, VerificationError> {
    let read_error = |source: csv::Error| VerificationError::Read { path: path.to_path_buf(), source };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(read_error)?;

    let mut accounts = Vec::new();

    for result in reader.deserialize::<AccountRow>() {
        let row = result.map_err(read_error)?;
        let invalid = |field: &'static str, value: &str| VerificationError::InvalidValue {
            path: path.to_path_buf(),
            client: row.client,
            field,
            value: value.to_string()
        };

        let decimal = |field: &'static str, value: &str| Decimal::from_str(value).map_err(|_| invalid(field, value));

        let locked = match row.locked.to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(invalid("locked", &row.locked))
        };

        accounts.push(AccountState {
            client: row.client,
            available: decimal("available", &row.available)?,
            held: decimal("held", &row.held)?,
            total: decimal("total", &row.total)?,
            locked
        });
    }

    debug!("Loaded {} account rows from {}", accounts.len(), path.display());

    Ok(accounts)
}

/// Checks the actual engine output against the expected snapshot.
///
/// Amounts are floored to whole units and may differ by at most one; the lock
/// flag must match exactly. Clients missing from the snapshot must be in their
/// default state in the actual output.
pub fn compare(expected: &[AccountState], actual: &[AccountState]) -> Result<VerificationReport, VerificationError> {
    let expected_by_client = index_by_client(expected, "the expected snapshot")?;
    let actual_by_client = index_by_client(actual, "the actual output")?;

    for state in expected {
        let found = actual_by_client.get(&state.client)
            .ok_or(VerificationError::MissingClient(state.client))?;

        compare_amount(state.client, "available", state.available, found.available)?;
        compare_amount(state.client, "held", state.held, found.held)?;
        compare_amount(state.client, "total", state.total, found.total)?;

        if state.locked != found.locked {
            return Err(VerificationError::Mismatch {
                client: state.client,
                field: "locked",
                expected: state.locked.to_string(),
                actual: found.locked.to_string()
            });
        }
    }

    let mut extra_clients = 0;

    for state in actual.iter().filter(|state| !expected_by_client.contains_key(&state.client)) {
        let is_default = [state.available, state.held, state.total]
            .into_iter()
            .all(|value| approximately_equal(Decimal::ZERO, value));

        if !is_default || state.locked {
            return Err(VerificationError::UnexpectedClient {
                client: state.client,
                available: state.available,
                locked: state.locked
            });
        }

        extra_clients += 1;
    }

    Ok(VerificationReport {
        clients_checked: expected.len(),
        extra_clients
    })
}

fn index_by_client<'a>(states: &'a [AccountState], source: &'static str) -> Result<HashMap<ClientId, &'a AccountState>, VerificationError> {
    let mut by_client = HashMap::with_capacity(states.len());

    for state in states {
        if by_client.insert(state.client, state).is_some() {
            return Err(VerificationError::DuplicateClient(state.client, source));
        }
    }

    Ok(by_client)
}

fn compare_amount(client: ClientId, field: &'static str, expected: Decimal, actual: Decimal) -> Result<(), VerificationError> {
    if approximately_equal(expected, actual) {
        return Ok(());
    }

    Err(VerificationError::Mismatch {
        client,
        field,
        expected: expected.to_string(),
        actual: actual.to_string()
    })
}

fn approximately_equal(expected: Decimal, actual: Decimal) -> bool {
    (expected.floor() - actual.floor()).abs() <= Decimal::ONE
}
