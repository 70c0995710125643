use super::{ensure_distinct_outputs, export_snapshots, CsvSink, OutputError, RecordSink, StreamEmitter};

use std::fs;
use std::str::FromStr;

use anyhow::Result;
use tempfile::tempdir;

use crate::models::{ClientSnapshot, EmittedTransaction, TransactionType};
use crate::storage::Ledger;
use crate::types::Monetary;

fn csv_text(sink: CsvSink<Vec<u8>>) -> Result<String> {
    Ok(String::from_utf8(sink.into_inner()?)?)
}

#[test]
fn test_csv_sink_writes_header_even_without_rows() -> Result<()> {
    let sink = CsvSink::new(Vec::new(), &EmittedTransaction::HEADER)?;

    assert_eq!(csv_text(sink)?, "type,client,tx,amount\n");

    Ok(())
}

#[test]
fn test_emitter_writes_amount_rows_and_reference_rows() -> Result<()> {
    let mut sink = CsvSink::new(Vec::new(), &EmittedTransaction::HEADER)?;
    let mut emitter = StreamEmitter::new(&mut sink);

    emitter.emit(&EmittedTransaction::with_amount(TransactionType::Deposit, 1, "7".to_string(), Monetary::from_str("100")?))?;
    emitter.emit(&EmittedTransaction::reference(TransactionType::Dispute, 1, "7".to_string()))?;

    assert_eq!(emitter.emitted(), 2);
    assert_eq!(emitter.finish()?, 2);
    assert_eq!(csv_text(sink)?, "type,client,tx,amount\ndeposit,1,7,100.00\ndispute,1,7,\n");

    Ok(())
}

#[test]
fn test_snapshot_export_skips_default_clients() -> Result<()> {
    let mut ledger = Ledger::with_pool(3);
    ledger.apply(1, TransactionType::Deposit, Monetary::from_str("100.00")?)?;
    ledger.apply(1, TransactionType::Dispute, Monetary::from_str("100.00")?)?;
    ledger.apply(1, TransactionType::Chargeback, Monetary::from_str("100.00")?)?;
    ledger.apply(3, TransactionType::Deposit, Monetary::from_str("5.25")?)?;

    let mut sink = CsvSink::new(Vec::new(), &ClientSnapshot::HEADER)?;
    let written = export_snapshots(&ledger, &mut sink)?;

    assert_eq!(written, 2);
    assert_eq!(
        csv_text(sink)?,
        "client,available,held,total,locked\n1,0.00,0.00,0.00,true\n3,5.25,0.00,5.25,false\n"
    );

    Ok(())
}

#[test]
fn test_vec_sink_collects_records_in_order() -> Result<()> {
    let mut ledger = Ledger::with_pool(2);
    ledger.apply(2, TransactionType::Deposit, Monetary::from_str("1.00")?)?;
    ledger.apply(1, TransactionType::Deposit, Monetary::from_str("2.00")?)?;

    let mut rows: Vec<ClientSnapshot> = Vec::new();
    export_snapshots(&ledger, &mut rows)?;
    rows.flush()?;

    assert_eq!(rows.iter().map(|row| row.client).collect::<Vec<_>>(), vec![1, 2]);

    Ok(())
}

#[test]
fn test_csv_sink_create_replaces_or_refuses_existing_files() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("nested").join("accounts.csv");

    let mut sink = CsvSink::create(&path, &ClientSnapshot::HEADER, true)?;
    RecordSink::<ClientSnapshot>::flush(&mut sink)?;
    drop(sink);

    assert_eq!(fs::read_to_string(&path)?, "client,available,held,total,locked\n");

    fs::write(&path, "stale")?;

    let refused = CsvSink::create(&path, &ClientSnapshot::HEADER, false);
    assert!(matches!(refused, Err(OutputError::DuplicateFileExists(_))));
    assert_eq!(fs::read_to_string(&path)?, "stale");

    let mut replaced = CsvSink::create(&path, &ClientSnapshot::HEADER, true)?;
    RecordSink::<ClientSnapshot>::flush(&mut replaced)?;
    drop(replaced);

    assert_eq!(fs::read_to_string(&path)?, "client,available,held,total,locked\n");

    Ok(())
}

#[test]
fn test_outputs_sharing_one_file_are_refused() -> Result<()> {
    let directory = tempdir()?;
    let transactions = directory.path().join("transactions.csv");
    let expected = directory.path().join("expected.csv");

    ensure_distinct_outputs(&transactions, &expected)?;

    let same = ensure_distinct_outputs(&transactions, &directory.path().join(".").join("transactions.csv"));
    assert!(matches!(same, Err(OutputError::SharedOutputPath(_))));

    fs::write(&transactions, "existing")?;
    let through_parent = directory.path().join("nested").join("..").join("transactions.csv");
    fs::create_dir(directory.path().join("nested"))?;

    assert!(matches!(ensure_distinct_outputs(&transactions, &through_parent), Err(OutputError::SharedOutputPath(_))));

    Ok(())
}
