//! Newline-delimited JSON input.
//!
//! Each line holds one JSON value and must be UTF-8. A line that does not
//! decode is logged with its (1-based) line number and skipped; one bad line
//! never ends the stream. Blank lines are ignored. I/O errors are returned.

use serde_json::Value;
use std::io::{self, BufRead};

#[derive(Debug, Clone, PartialEq)]
pub struct NdjsonLine {
    pub line_number: usize,
    pub value: Value,
}

pub struct NdjsonReader<R> {
    input: R,
    buf: Vec<u8>,
    line_number: usize,
    skipped: usize,
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Lines dropped so far because they were not valid JSON.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for NdjsonReader<R> {
    type Item = io::Result<NdjsonLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_number += 1;

            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<Value>(&self.buf) {
                Ok(value) => {
                    return Some(Ok(NdjsonLine {
                        line_number: self.line_number,
                        value,
                    }))
                }
                Err(e) => {
                    self.skipped += 1;
                    tracing::error!(
                        line = self.line_number,
                        error = %e,
                        "problem with JSON record; skipping line"
                    );
                }
            }
        }
    }
}
