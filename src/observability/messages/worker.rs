// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for a worker rank's carry protocol.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Worker received `StatusBroadcast{fail}` and leaves the run without a result.
///
/// # Log Level
/// `info!`
pub struct WorkerAborted {
    pub rank: usize,
}

impl Display for WorkerAborted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rank {} received fail status; leaving the run without a result",
            self.rank
        )
    }
}

/// Chunk assignment received from the coordinator.
///
/// # Log Level
/// `debug!`
pub struct ChunkReceived {
    pub rank: usize,
    pub chunk_length: usize,
}

impl Display for ChunkReceived {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rank {} received a chunk of {} tokens",
            self.rank, self.chunk_length
        )
    }
}

/// The chunk's boundary pair sums to B-1; speculation starts.
///
/// # Log Level
/// `debug!`
///
/// # Example
/// ```
/// use the_carry_chain::observability::messages::worker::BoundaryTieDetected;
///
/// let msg = BoundaryTieDetected {
///     rank: 3,
///     chunk_length: 1,
/// };
///
/// assert!(msg.to_string().contains("rank 3"));
/// ```
pub struct BoundaryTieDetected {
    pub rank: usize,
    pub chunk_length: usize,
}

impl Display for BoundaryTieDetected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Boundary tie on rank {}: speculating carry-in 1 across {} tokens",
            self.rank, self.chunk_length
        )
    }
}

impl StructuredLog for BoundaryTieDetected {
    fn log(&self) {
        tracing::debug!(
            rank = self.rank,
            chunk_length = self.chunk_length,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "speculation",
            span_name = name,
            rank = self.rank,
            chunk_length = self.chunk_length,
        )
    }
}

/// Carry-out sent to the left neighbour.
///
/// # Log Level
/// `debug!`
pub struct CarryForwarded {
    pub rank: usize,
    pub to: usize,
    pub bit: u8,
    /// Sent before the carry-in arrived (no boundary tie)
    pub early: bool,
}

impl Display for CarryForwarded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rank {} forwarded carry {} to rank {}{}",
            self.rank,
            self.bit,
            self.to,
            if self.early { " before its carry-in arrived" } else { "" }
        )
    }
}

/// The chunk's outcome collapsed against the true carry-in.
///
/// # Log Level
/// `debug!`
pub struct CarryResolved {
    pub rank: usize,
    pub carry_in: u8,
    pub carry_out: u8,
    pub tied: bool,
}

impl Display for CarryResolved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rank {} resolved carry_in={} -> carry_out={} ({})",
            self.rank,
            self.carry_in,
            self.carry_out,
            if self.tied { "selected" } else { "absorbed" }
        )
    }
}

/// Worker sent its result chunk and left the run.
///
/// # Log Level
/// `info!` - per-rank protocol time
pub struct WorkerFinished {
    pub rank: usize,
    pub elapsed: Duration,
}

impl Display for WorkerFinished {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rank {} finished in {:?}", self.rank, self.elapsed)
    }
}

impl StructuredLog for WorkerFinished {
    fn log(&self) {
        tracing::info!(
            rank = self.rank,
            elapsed_us = self.elapsed.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker_finished",
            span_name = name,
            rank = self.rank,
            elapsed = ?self.elapsed,
        )
    }
}

/// A rank's task ended with an error.
///
/// # Log Level
/// `error!`
pub struct RankFailed<'a> {
    pub rank: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for RankFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rank {} failed: {}", self.rank, self.error)
    }
}
