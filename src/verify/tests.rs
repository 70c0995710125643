use super::oracle::{compare, load_accounts, verify_files, AccountState, VerificationReport};
use super::VerificationError;

use std::fs;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn state(client: u16, available: &str, held: &str, total: &str, locked: bool) -> Result<AccountState> {
    Ok(AccountState {
        client,
        available: Decimal::from_str(available)?,
        held: Decimal::from_str(held)?,
        total: Decimal::from_str(total)?,
        locked
    })
}

#[test]
fn test_identical_snapshots_match() -> Result<()> {
    let expected = vec![
        state(1, "10.50", "0.00", "10.50", false)?,
        state(2, "0.00", "0.00", "0.00", true)?
    ];

    let report = compare(&expected, &expected)?;

    assert_eq!(report, VerificationReport { clients_checked: 2, extra_clients: 0 });

    Ok(())
}

#[test]
fn test_amounts_within_one_unit_after_flooring_match() -> Result<()> {
    let expected = vec![state(1, "100.99", "5.00", "105.99", false)?];
    let actual = vec![state(1, "101.0001", "4.9999", "105.9900", false)?];

    assert!(compare(&expected, &actual).is_ok());

    Ok(())
}

#[test]
fn test_amounts_beyond_tolerance_are_reported() -> Result<()> {
    let expected = vec![state(1, "100.00", "0.00", "100.00", false)?];
    let actual = vec![state(1, "102.00", "0.00", "102.00", false)?];

    let result = compare(&expected, &actual);

    assert!(matches!(result, Err(VerificationError::Mismatch { client: 1, field: "available", .. })));

    Ok(())
}

#[test]
fn test_lock_flag_must_match() -> Result<()> {
    let expected = vec![state(3, "0.00", "0.00", "0.00", true)?];
    let actual = vec![state(3, "0.00", "0.00", "0.00", false)?];

    assert!(matches!(compare(&expected, &actual), Err(VerificationError::Mismatch { field: "locked", .. })));

    Ok(())
}

#[test]
fn test_missing_and_unexpected_clients_are_reported() -> Result<()> {
    let expected = vec![state(1, "1.00", "0.00", "1.00", false)?];

    let missing = compare(&expected, &[]);
    assert!(matches!(missing, Err(VerificationError::MissingClient(1))));

    let with_extra_default = vec![expected[0].clone(), state(9, "0.0000", "0.0000", "0.0000", false)?];
    assert_eq!(compare(&expected, &with_extra_default)?.extra_clients, 1);

    let with_extra_funds = vec![expected[0].clone(), state(9, "50.00", "0.00", "50.00", false)?];
    assert!(matches!(compare(&expected, &with_extra_funds), Err(VerificationError::UnexpectedClient { client: 9, .. })));

    let duplicated = vec![expected[0].clone(), expected[0].clone()];
    assert!(matches!(compare(&expected, &duplicated), Err(VerificationError::DuplicateClient(1, _))));

    Ok(())
}

#[test]
fn test_load_accounts_accepts_text_and_integer_lock_flags() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("accounts.csv");
    fs::write(&path, "client, available, held, total, locked\n1, 1.5, 0, 1.5, TRUE\n2,2.0000,0.0000,2.0000,0\n3,0,0,0,1\n")?;

    let accounts = load_accounts(&path)?;

    assert_eq!(accounts, vec![
        state(1, "1.5", "0", "1.5", true)?,
        state(2, "2.0000", "0.0000", "2.0000", false)?,
        state(3, "0", "0", "0", true)?
    ]);

    Ok(())
}

#[test]
fn test_load_accounts_reports_invalid_values() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("accounts.csv");
    fs::write(&path, "client,available,held,total,locked\n4,abc,0,0,false\n")?;

    assert!(matches!(load_accounts(&path), Err(VerificationError::InvalidValue { client: 4, field: "available", .. })));

    fs::write(&path, "client,available,held,total,locked\n4,0,0,0,maybe\n")?;

    assert!(matches!(load_accounts(&path), Err(VerificationError::InvalidValue { field: "locked", .. })));
    assert!(matches!(load_accounts(&directory.path().join("missing.csv")), Err(VerificationError::Read { .. })));

    Ok(())
}

#[tokio::test]
async fn test_verify_files_compares_both_inputs() -> Result<()> {
    let directory = tempdir()?;
    let expected = directory.path().join("expected.csv");
    let actual = directory.path().join("actual.csv");

    fs::write(&expected, "client,available,held,total,locked\n1,10.00,0.00,10.00,false\n")?;
    fs::write(&actual, "client,available,held,total,locked\n1,10.0000,0.0000,10.0000,false\n2,0.0000,0.0000,0.0000,false\n")?;

    let report = verify_files(expected.clone(), actual.clone()).await?;

    assert_eq!(report, VerificationReport { clients_checked: 1, extra_clients: 1 });

    fs::write(&actual, "client,available,held,total,locked\n1,10.00,0.00,10.00,true\n")?;

    assert!(verify_files(expected, actual).await.is_err());

    Ok(())
}
