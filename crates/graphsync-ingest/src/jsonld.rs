//! JSON-LD document output.
//!
//! Records are buffered as they arrive and written as a single document when
//! the writer is closed: a plain array, or `{"@context": ..., "@graph": [...]}`
//! when a context was supplied.

use serde_json::{json, Value};
use std::io::{self, Write};

pub struct JsonLdWriter<W: Write> {
    out: W,
    records: Vec<Value>,
    context: Option<Value>,
}

impl<W: Write> JsonLdWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn put(&mut self, record: Value) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the document and hand back the underlying writer.
    pub fn close(mut self) -> io::Result<W> {
        let records = std::mem::take(&mut self.records);
        let doc = match self.context.take() {
            Some(context) => json!({ "@context": context, "@graph": records }),
            None => Value::Array(records),
        };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}
