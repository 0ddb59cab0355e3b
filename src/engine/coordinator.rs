// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Coordinator rank routine.
//!
//! The coordinator validates and tokenizes the input, broadcasts the run
//! status, hands each worker its chunk pair, and assembles the result from the
//! workers' `ResultChunk`s. It never adds digits itself.
//!
//! Result chunks are collected in rank order, which is most significant first,
//! so concatenating them yields the sum without any reordering. When rank 1
//! reports a carry-out the result gains one unpadded leading `1`.

use std::time::Instant;

use crate::codec::{decode, encode, BigNumber};
use crate::config::NumberingScheme;
use crate::errors::{AdditionError, CommunicationFailure, ConfigError};
use crate::observability::messages::coordinator::{
    ChunksDistributed, ResultChunkReceived, RunCompleted, RunRejected, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::partition::{partition, ChunkPair, RemainderPolicy};
use crate::protocol::{CarryBit, Communicator, Message, Rank, Status, Topology};

/// Two operands to add, as decimal digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionRequest {
    /// Declared operand length in tokens, checked against both operands when set
    pub token_length: Option<usize>,
    pub first: String,
    pub second: String,
}

impl AdditionRequest {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            token_length: None,
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn with_token_length(mut self, token_length: usize) -> Self {
        self.token_length = Some(token_length);
        self
    }
}

/// Run-wide settings the coordinator needs beyond the topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinatorSettings {
    pub scheme: NumberingScheme,
    pub remainder: RemainderPolicy,
}

/// The assembled sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionResult {
    /// Decimal digits, zero padding of the operands preserved
    pub digits: String,
    /// The most significant chunk overflowed and `digits` has one extra leading digit
    pub carry_out: bool,
}

/// Run the coordinator protocol on rank 0.
///
/// Invalid input is answered with `StatusBroadcast{fail}` to every worker
/// before the error is returned, so workers leave the run cleanly.
///
/// # Errors
/// * `AdditionError::Config` / `AdditionError::Format` - rejected input
/// * `AdditionError::Communication` - a worker failed, timed out or misbehaved
pub async fn run_coordinator<C: Communicator>(
    comm: &mut C,
    topology: &Topology,
    request: &AdditionRequest,
    settings: CoordinatorSettings,
) -> Result<AdditionResult, AdditionError> {
    let started = Instant::now();

    let chunks = match prepare(topology, request, &settings) {
        Ok(chunks) => chunks,
        Err(error) => {
            RunRejected { error: &error }.log();
            broadcast(comm, topology, Status::Fail).await?;
            return Err(error);
        }
    };

    let chunk_length = chunks.first().map(ChunkPair::len).unwrap_or_default();
    RunStarted {
        workers: topology.workers(),
        tokens: chunk_length * topology.workers(),
        token_width: settings.scheme.token_width(),
    }
    .log();

    broadcast(comm, topology, Status::Ok).await?;
    for chunk in chunks {
        comm.send(
            chunk.rank,
            Message::ChunkAssignment {
                chunk_length: chunk.len(),
                operand_a: chunk.first,
                operand_b: chunk.second,
            },
        )
        .await?;
    }
    tracing::debug!(
        "{}",
        ChunksDistributed {
            workers: topology.workers(),
            chunk_length,
        }
    );

    let (sum, carry_out) = collect(comm, topology, chunk_length).await?;

    let mut assembled = BigNumber::new();
    if carry_out.is_set() {
        assembled.extend_from_slice(&[1]);
    }
    assembled.extend_from_slice(sum.tokens());
    let digits = decode(&assembled, &settings.scheme, carry_out.is_set())?;

    RunCompleted {
        digits: digits.len(),
        leading_carry: carry_out.is_set(),
        duration: started.elapsed(),
    }
    .log();

    Ok(AdditionResult {
        digits,
        carry_out: carry_out.is_set(),
    })
}

/// Validate the request and split it into one chunk pair per worker.
fn prepare(
    topology: &Topology,
    request: &AdditionRequest,
    settings: &CoordinatorSettings,
) -> Result<Vec<ChunkPair>, AdditionError> {
    let first = encode(&request.first, &settings.scheme)?;
    let second = encode(&request.second, &settings.scheme)?;

    if let Some(declared) = request.token_length {
        for actual in [first.len(), second.len()] {
            if actual != declared {
                return Err(ConfigError::DeclaredLengthMismatch { declared, actual }.into());
            }
        }
    }

    Ok(partition(&first, &second, topology, settings.remainder)?)
}

async fn broadcast<C: Communicator>(
    comm: &C,
    topology: &Topology,
    status: Status,
) -> Result<(), CommunicationFailure> {
    for rank in topology.worker_ranks() {
        comm.send(rank, Message::StatusBroadcast { status }).await?;
    }
    Ok(())
}

/// Receive every worker's result chunk, most significant first.
///
/// Returns the concatenated digits and the most significant worker's carry-out.
async fn collect<C: Communicator>(
    comm: &mut C,
    topology: &Topology,
    chunk_length: usize,
) -> Result<(BigNumber, CarryBit), CommunicationFailure> {
    let mut sum = BigNumber::new();
    let mut leading = CarryBit::Zero;

    for rank in topology.worker_ranks() {
        let (tokens, carry_out) = match comm.recv(rank).await? {
            Message::ResultChunk { tokens, carry_out } => (tokens, carry_out),
            other => {
                return Err(CommunicationFailure::UnexpectedMessage {
                    rank: Rank::COORDINATOR.index(),
                    peer: rank.index(),
                    expected: "ResultChunk",
                    found: other.kind(),
                })
            }
        };

        if tokens.len() != chunk_length {
            return Err(CommunicationFailure::ChunkShape {
                rank: Rank::COORDINATOR.index(),
                reason: format!(
                    "rank {} returned {} tokens for a chunk of {}",
                    rank.index(),
                    tokens.len(),
                    chunk_length
                ),
            });
        }
        let carry_out = CarryBit::try_from(carry_out).map_err(|value| {
            CommunicationFailure::InvalidCarry {
                rank: Rank::COORDINATOR.index(),
                value,
            }
        })?;

        tracing::debug!(
            "{}",
            ResultChunkReceived {
                rank: rank.index(),
                tokens: tokens.len(),
                carry_out: carry_out.as_u8(),
            }
        );

        if rank == topology.most_significant_worker() {
            leading = carry_out;
        }
        sum.extend_from_slice(&tokens);
    }

    Ok((sum, leading))
}
