use std::fs::{canonicalize, create_dir_all, remove_file, File};
use std::io::{BufWriter, Write};
use std::path::{absolute, Path};

use csv::{Writer, WriterBuilder};
use serde::Serialize;
use tracing::warn;

use crate::output::OutputError;

/// Destination for rows of a fixed schema.
pub trait RecordSink<R> {
    fn append(&mut self, record: &R) -> Result<(), OutputError>;

    fn flush(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

impl<R: Clone> RecordSink<R> for Vec<R> {
    fn append(&mut self, record: &R) -> Result<(), OutputError> {
        self.push(record.clone());
        Ok(())
    }
}

/// CSV sink that always starts with a header row, even if no record follows.
pub struct CsvSink<W: Write> {
    writer: Writer<W>
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W, header: &[&str]) -> Result<Self, OutputError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);

        writer.write_record(header)?;

        Ok(Self { writer })
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W, OutputError> {
        self.writer.into_inner().map_err(|error| OutputError::Io(error.into_error()))
    }
}

impl CsvSink<BufWriter<File>> {
    /// Creates the file at `path`, along with any missing parent directories.
    ///
    /// An existing file is replaced unless `clobber` is false, in which case
    /// `OutputError::DuplicateFileExists` is returned and nothing is touched.
    pub fn create(path: &Path, header: &[&str], clobber: bool) -> Result<Self, OutputError> {
        if path.exists() {
            if !clobber {
                return Err(OutputError::DuplicateFileExists(path.to_path_buf()));
            }

            warn!("Replacing existing output file: {}", path.display());
            remove_file(path)?;
        }

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        Self::new(BufWriter::new(File::create(path)?), header)
    }
}

/// Fails if two output paths name the same file, either literally or through
/// links once both exist.
pub fn ensure_distinct_outputs(first: &Path, second: &Path) -> Result<(), OutputError> {
    let same_file = absolute(first)? == absolute(second)?
        || matches!((canonicalize(first), canonicalize(second)), (Ok(first), Ok(second)) if first == second);

    if same_file {
        return Err(OutputError::SharedOutputPath(first.to_path_buf()));
    }

    Ok(())
}

impl<W: Write, R: Serialize> RecordSink<R> for CsvSink<W> {
    fn append(&mut self, record: &R) -> Result<(), OutputError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
