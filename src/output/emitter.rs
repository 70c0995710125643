use crate::models::{ClientSnapshot, EmittedTransaction};
use crate::output::{OutputError, RecordSink};
use crate::storage::Ledger;

/// Appends generated transactions to a sink in generation order.
pub struct StreamEmitter<'a, S> {
    sink: &'a mut S,
    emitted: usize
}

impl<'a, S: RecordSink<EmittedTransaction>> StreamEmitter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            emitted: 0
        }
    }

    pub fn emit(&mut self, transaction: &EmittedTransaction) -> Result<(), OutputError> {
        self.sink.append(transaction)?;
        self.emitted += 1;

        Ok(())
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Flushes the sink and returns how many rows were written.
    pub fn finish(self) -> Result<usize, OutputError> {
        self.sink.flush()?;
        Ok(self.emitted)
    }
}

/// Writes one row per client whose state differs from a fresh account, in
/// ledger order, and returns the number of rows written.
pub fn export_snapshots<S: RecordSink<ClientSnapshot>>(ledger: &Ledger, sink: &mut S) -> Result<usize, OutputError> {
    let mut written = 0;

    for snapshot in ledger.client_ids().filter_map(|account_id| ledger.snapshot(account_id)) {
        if snapshot.is_default() {
            continue;
        }

        sink.append(&snapshot)?;
        written += 1;
    }

    sink.flush()?;

    Ok(written)
}
