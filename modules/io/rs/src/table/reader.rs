use std::io::BufRead;
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use eyre::{Context, Result};

use super::dialect::Dialect;
use super::schema::Schema;
use crate::compression::Compression;
use crate::traits::ReadRecord;

/// Number of data rows parsed successfully and skipped as malformed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Dissolve, Getters)]
pub struct ReadSummary {
    parsed: usize,
    skipped: usize,
}

/// Line-oriented reader of delimited tables with an explicit column layout.
///
/// Header lines, blank lines and comments are ignored. Rows that don't match the schema are
/// skipped and tallied in the summary, I/O errors are propagated.
pub struct Reader<R, S> {
    reader: R,
    schema: S,
    dialect: Dialect,
    buffer: String,
    line: usize,
    summary: ReadSummary,
    reported: bool,
}

impl<R: BufRead, S: Schema> Reader<R, S> {
    pub fn new(reader: R, schema: S, dialect: Dialect) -> Self {
        Self {
            reader,
            schema,
            dialect,
            buffer: String::new(),
            line: 0,
            summary: ReadSummary::default(),
            reported: false,
        }
    }

    pub fn summary(&self) -> &ReadSummary {
        &self.summary
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn report(&mut self) {
        if self.reported {
            return;
        }
        self.reported = true;
        if self.summary.skipped > 0 {
            log::warn!(
                "Skipped {} malformed rows out of {} ({} parsed)",
                self.summary.skipped,
                self.summary.skipped + self.summary.parsed,
                self.summary.parsed
            );
        }
    }
}

impl<S: Schema> Reader<Box<dyn BufRead + Send + 'static>, S> {
    /// Open a table on disk. The compression must be given explicitly, use
    /// [`Compression::from_path`] to derive it from the file extension.
    pub fn from_path(
        path: impl AsRef<Path>,
        schema: S,
        dialect: Dialect,
        compression: Compression,
    ) -> Result<Self> {
        let path = path.as_ref();
        let stream = compression
            .open(path)
            .wrap_err_with(|| format!("Failed to read table {}", path.display()))?;
        Ok(Self::new(stream, schema, dialect))
    }
}

impl<R: BufRead, S: Schema> ReadRecord for Reader<R, S> {
    type Record = S::Record;

    fn read_record(&mut self) -> Result<Option<Self::Record>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .wrap_err_with(|| format!("Failed to read line {}", self.line + 1))?;
            if read == 0 {
                self.report();
                return Ok(None);
            }
            self.line += 1;

            if self.line <= *self.dialect.header_lines() {
                continue;
            }
            let line = self.buffer.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with(*self.dialect.comment()) {
                continue;
            }

            let fields: Vec<&str> = line.split(*self.dialect.delimiter()).collect();
            match self.schema.parse(&fields) {
                Ok(record) => {
                    self.summary.parsed += 1;
                    return Ok(Some(record));
                }
                Err(err) => {
                    log::debug!("Skipping malformed row {}: {err:#}", self.line);
                    self.summary.skipped += 1;
                }
            }
        }
    }
}
