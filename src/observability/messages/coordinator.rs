// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the coordinator's run lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Input validation and the status broadcast
//! * Chunk distribution and result collection
//! * Result assembly and persistence

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Run accepted; chunks are about to be distributed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_carry_chain::observability::messages::coordinator::RunStarted;
///
/// let msg = RunStarted {
///     workers: 2,
///     tokens: 2,
///     token_width: 9,
/// };
///
/// assert_eq!(msg.to_string(), "Starting distributed addition: 2 tokens per operand across 2 workers (token_width=9)");
/// ```
pub struct RunStarted {
    pub workers: usize,
    pub tokens: usize,
    pub token_width: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting distributed addition: {} tokens per operand across {} workers (token_width={})",
            self.tokens, self.workers, self.token_width
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            workers = self.workers,
            tokens = self.tokens,
            token_width = self.token_width,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            workers = self.workers,
            tokens = self.tokens,
        )
    }
}

/// Input rejected before distribution; workers receive `StatusBroadcast{fail}`.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunRejected<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for RunRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run rejected before distribution: {}", self.error)
    }
}

impl StructuredLog for RunRejected<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("run_rejected", span_name = name, error = %self.error)
    }
}

/// Every worker has been sent its chunk pair.
///
/// # Log Level
/// `debug!`
pub struct ChunksDistributed {
    pub workers: usize,
    pub chunk_length: usize,
}

impl Display for ChunksDistributed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Distributed {} chunk pairs of {} tokens",
            self.workers, self.chunk_length
        )
    }
}

/// A worker's finalized chunk arrived.
///
/// # Log Level
/// `debug!`
pub struct ResultChunkReceived {
    pub rank: usize,
    pub tokens: usize,
    pub carry_out: u8,
}

impl Display for ResultChunkReceived {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Received result chunk from rank {}: {} tokens, carry_out={}",
            self.rank, self.tokens, self.carry_out
        )
    }
}

/// Result assembled from every worker's chunk.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub digits: usize,
    pub leading_carry: bool,
    pub duration: Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Distributed addition completed: {} digits{} in {:?}",
            self.digits,
            if self.leading_carry {
                " (including carried leading digit)"
            } else {
                ""
            },
            self.duration
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            digits = self.digits,
            leading_carry = self.leading_carry,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            digits = self.digits,
            duration = ?self.duration,
        )
    }
}

/// Result written to its output file.
///
/// # Log Level
/// `info!`
pub struct ResultPersisted<'a> {
    pub path: &'a str,
    pub digits: usize,
}

impl Display for ResultPersisted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Wrote {} digit result to '{}'", self.digits, self.path)
    }
}
