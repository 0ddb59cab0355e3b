// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Failures of the point-to-point message exchange between ranks.
//!
//! There is no recovery policy: any `CommunicationFailure` is fatal to the run.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommunicationFailure {
    /// The peer's end of the channel is gone.
    #[error("Rank {rank} lost its channel to rank {peer}")]
    Disconnected { rank: usize, peer: usize },

    /// A blocking receive exceeded the configured receive timeout.
    #[error("Rank {rank} timed out after {waited:?} waiting for rank {peer}")]
    Timeout {
        rank: usize,
        peer: usize,
        waited: Duration,
    },

    /// A message arrived that does not fit the protocol step.
    #[error("Rank {rank} expected {expected} from rank {peer} but received {found}")]
    UnexpectedMessage {
        rank: usize,
        peer: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// A carry signal holding something other than 0 or 1.
    #[error("Rank {rank} received invalid carry value {value}")]
    InvalidCarry { rank: usize, value: u8 },

    /// A chunk assignment or result chunk with an inconsistent shape.
    #[error("Rank {rank} received a malformed chunk: {reason}")]
    ChunkShape { rank: usize, reason: String },

    /// The task running a rank panicked or was aborted.
    #[error("Rank {rank} task failed: {reason}")]
    TaskFailed { rank: usize, reason: String },

    /// The run was torn down because another rank failed first.
    #[error("Rank {rank} stopped because the run was cancelled")]
    Cancelled { rank: usize },
}
