//! NDJSON → decode → serialize → submit, one record at a time.
//!
//! A record that cannot be decoded, fails validation, or is rejected by the
//! store is counted as failed and the batch moves on. Malformed input lines
//! are counted as skipped.

use crate::error::TransportError;
use crate::sink::UpdateSink;
use graphsync_core::{IrError, Serializer};
use graphsync_ingest::{DecodeError, NdjsonLine, NdjsonReader, RecordDecoder};
use std::io::{self, BufRead};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("invalid record: {0}")]
    Invalid(#[from] IrError),
    #[error("submit: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub statements: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

pub struct BatchLoader<S> {
    decoder: RecordDecoder,
    serializer: Serializer,
    sink: S,
}

impl<S: UpdateSink> BatchLoader<S> {
    pub fn new(decoder: RecordDecoder, serializer: Serializer, sink: S) -> Self {
        Self {
            decoder,
            serializer,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load a single line; returns the number of statements submitted.
    pub async fn load_line(&self, line: &NdjsonLine) -> Result<usize, LoadError> {
        let record = self.decoder.decode_record(&line.value)?;
        let statements = self.serializer.serialize(&record)?;
        self.sink.submit(&statements).await?;
        Ok(statements.len())
    }

    pub async fn load<R: BufRead>(&self, input: R) -> io::Result<BatchReport> {
        let mut reader = NdjsonReader::new(input);
        let mut report = BatchReport::default();
        for line in reader.by_ref() {
            let line = line?;
            match self.load_line(&line).await {
                Ok(n) => {
                    report.succeeded += 1;
                    report.statements += n;
                }
                Err(error) => {
                    report.failed += 1;
                    tracing::error!(line = line.line_number, %error, "record failed");
                }
            }
        }
        report.skipped = reader.skipped();
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            statements = report.statements,
            "batch finished"
        );
        Ok(report)
    }
}
