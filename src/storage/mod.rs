// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input record and result file handling.
//!
//! An input record is plain whitespace-separated text:
//!
//! ```text
//! <L> <A> <B>
//! ```
//!
//! where `L` is the operand length in tokens and `A`, `B` are the operands as
//! zero-padded decimal strings. The result file holds the sum on a single
//! newline-terminated line and is written only by the coordinator side of a run.

use std::fs;
use std::path::Path;

use crate::engine::coordinator::AdditionRequest;
use crate::errors::{AdditionError, ConfigError};

/// A parsed input record. Digits are not checked here; that happens when the
/// coordinator tokenizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub token_length: usize,
    pub first: String,
    pub second: String,
}

impl InputRecord {
    /// Parse `<L> <A> <B>` from text.
    ///
    /// # Example
    /// ```
    /// use the_carry_chain::storage::InputRecord;
    ///
    /// let record = InputRecord::parse("2\n000000001999999999\n000000000000000001\n").unwrap();
    /// assert_eq!(record.token_length, 2);
    /// assert_eq!(record.second, "000000000000000001");
    /// ```
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [length, first, second] = fields[..] else {
            return Err(ConfigError::InvalidRecord {
                reason: format!("expected 3 fields `<L> <A> <B>`, found {}", fields.len()),
            });
        };

        let token_length = length.parse::<usize>().map_err(|e| ConfigError::InvalidRecord {
            reason: format!("token length '{}' is not a non-negative integer: {}", length, e),
        })?;

        Ok(Self {
            token_length,
            first: first.to_string(),
            second: second.to_string(),
        })
    }
}

impl From<InputRecord> for AdditionRequest {
    fn from(record: InputRecord) -> Self {
        AdditionRequest::new(record.first, record.second).with_token_length(record.token_length)
    }
}

/// Read and parse an input record file.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<InputRecord, AdditionError> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(InputRecord::parse(&text)?)
}

/// Write `digits` as the run's single output line, replacing any previous file.
pub fn persist_result<P: AsRef<Path>>(path: P, digits: &str) -> std::io::Result<()> {
    fs::write(path, format!("{}\n", digits))
}
