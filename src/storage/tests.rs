use super::{CatalogKind, Ledger, LedgerError, TransactionCatalog};
use crate::models::{AccountError, TransactionType};
use crate::types::Monetary;
use anyhow::{anyhow, Result};
use std::str::FromStr;

fn amount(value: &str) -> Result<Monetary> {
    Ok(Monetary::from_str(value)?)
}

#[test]
fn test_ledger_pool_starts_with_default_accounts() {
    let ledger = Ledger::with_pool(3);

    assert_eq!(ledger.client_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(ledger.accounts().all(|account| account.snapshot().is_default()));
    assert!(ledger.is_unlocked(2));
    assert!(!ledger.is_unlocked(4));
}

#[test]
fn test_ledger_grows_clients_in_insertion_order() -> Result<()> {
    let mut ledger = Ledger::new();

    assert!(ledger.is_empty());
    assert_eq!(ledger.add_client()?, 1);
    assert_eq!(ledger.add_client()?, 2);

    let mut ledger = Ledger::with_pool(5);

    assert_eq!(ledger.add_client()?, 6);
    assert_eq!(ledger.len(), 6);

    Ok(())
}

#[test]
fn test_ledger_reports_exhausted_client_pool() {
    let mut ledger = Ledger::with_pool(u16::MAX);

    assert_eq!(ledger.add_client(), Err(LedgerError::ClientPoolExhausted(u16::MAX)));
}

#[test]
fn test_ledger_apply_updates_only_the_target_client() -> Result<()> {
    let mut ledger = Ledger::with_pool(2);

    ledger.apply(1, TransactionType::Deposit, amount("25.00")?)?;

    let snapshot = ledger.snapshot(1).ok_or_else(|| anyhow!("client 1 missing"))?;

    assert_eq!(snapshot.available, amount("25.00")?);
    assert_eq!(snapshot.total, amount("25.00")?);
    assert!(ledger.snapshot(2).ok_or_else(|| anyhow!("client 2 missing"))?.is_default());

    Ok(())
}

#[test]
fn test_ledger_apply_surfaces_precondition_failures() -> Result<()> {
    let mut ledger = Ledger::with_pool(1);

    let unknown = ledger.apply(9, TransactionType::Deposit, amount("1.00")?);
    let overdrawn = ledger.apply(1, TransactionType::Withdrawal, amount("1.00")?);

    assert_eq!(unknown, Err(LedgerError::UnknownClient(9)));
    assert!(matches!(overdrawn, Err(LedgerError::Account(AccountError::InsufficientFunds { .. }))));

    Ok(())
}

#[test]
fn test_catalog_finds_deposit_strictly_under_ceiling() -> Result<()> {
    let mut catalog = TransactionCatalog::new();
    catalog.record("a".to_string(), 1, amount("80.00")?, CatalogKind::Deposit);
    catalog.record("b".to_string(), 1, amount("30.00")?, CatalogKind::Withdrawal);
    catalog.record("c".to_string(), 2, amount("10.00")?, CatalogKind::Deposit);
    catalog.record("d".to_string(), 1, amount("40.00")?, CatalogKind::Deposit);

    assert_eq!(catalog.find_deposit_under(1, amount("50.00")?), Some((amount("40.00")?, "d".to_string())));
    assert_eq!(catalog.find_deposit_under(1, amount("40.00")?), None);
    assert_eq!(catalog.find_deposit_under(3, amount("1000.00")?), None);
    assert_eq!(catalog.len(), 4);

    Ok(())
}

#[test]
fn test_catalog_never_offers_a_deposit_for_a_second_dispute() -> Result<()> {
    let mut catalog = TransactionCatalog::new();
    catalog.record("a".to_string(), 1, amount("10.00")?, CatalogKind::Deposit);
    catalog.record("b".to_string(), 1, amount("20.00")?, CatalogKind::Deposit);

    catalog.mark_disputed("a");
    catalog.mark_settled("a");

    assert_eq!(catalog.find_deposit_under(1, amount("100.00")?), Some((amount("20.00")?, "b".to_string())));
    assert!(catalog.get("a").is_some());

    Ok(())
}

#[test]
fn test_catalog_matches_held_amount_to_the_open_dispute() -> Result<()> {
    let mut catalog = TransactionCatalog::new();
    catalog.record("first".to_string(), 1, amount("15.00")?, CatalogKind::Deposit);
    catalog.record("second".to_string(), 1, amount("15.00")?, CatalogKind::Deposit);

    assert_eq!(catalog.find_deposit_equal(1, amount("15.00")?), None);

    catalog.mark_disputed("second");

    assert!(catalog.is_open_dispute("second"));
    assert_eq!(catalog.find_deposit_equal(1, amount("15.00")?), Some("second".to_string()));
    assert_eq!(catalog.find_deposit_equal(1, amount("15.01")?), None);

    catalog.mark_settled("second");

    assert_eq!(catalog.find_deposit_equal(1, amount("15.00")?), None);

    Ok(())
}

#[test]
fn test_catalog_keeps_the_first_entry_for_a_repeated_id() -> Result<()> {
    let mut catalog = TransactionCatalog::new();
    catalog.record("a".to_string(), 1, amount("10.00")?, CatalogKind::Deposit);
    catalog.record("a".to_string(), 2, amount("99.00")?, CatalogKind::Withdrawal);

    let entry = catalog.get("a").ok_or_else(|| anyhow!("entry missing"))?;

    assert_eq!(entry.account_id, 1);
    assert_eq!(entry.kind, CatalogKind::Deposit);
    assert_eq!(catalog.len(), 1);
    assert!(!catalog.is_empty());

    Ok(())
}
