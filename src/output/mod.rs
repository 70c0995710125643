mod emitter;
mod errors;
mod sink;
#[cfg(test)]
mod tests;

pub use emitter::{export_snapshots, StreamEmitter};
pub use errors::OutputError;
pub use sink::{ensure_distinct_outputs, CsvSink, RecordSink};
