// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Worker rank routine.
//!
//! Each worker owns one chunk pair and runs a short state machine:
//!
//! 1. Wait for the coordinator's `StatusBroadcast`; leave on `fail`.
//! 2. Receive the `ChunkAssignment` and reduce it locally with carry-in 0.
//! 3. Without a boundary tie the carry-out is already final, so it goes to the
//!    left neighbour straight away and the carry-in only touches the last digit.
//! 4. With a tie, the carry-in-1 branch is computed while the real carry is in
//!    flight; the carry selects a branch and only then is forwarded left.
//! 5. Send the `ResultChunk` (digits plus carry-out) to the coordinator.
//!
//! The least-significant worker has no right neighbour. Its carry-in is 0 and
//! it never speculates.

use std::time::Instant;

use tracing::Instrument;

use crate::codec::Token;
use crate::config::NumberingScheme;
use crate::engine::carry::{CarryEngine, ChunkOutcome, ResolvedChunk};
use crate::errors::CommunicationFailure;
use crate::observability::messages::worker::{
    BoundaryTieDetected, CarryForwarded, CarryResolved, ChunkReceived, WorkerAborted,
    WorkerFinished,
};
use crate::observability::messages::StructuredLog;
use crate::protocol::{CarryBit, Communicator, Message, Rank, Status, Topology};

/// How a worker left the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// The coordinator broadcast `fail`; no result was produced.
    Aborted,
    /// The worker delivered its result chunk.
    Completed {
        carry_in: CarryBit,
        carry_out: CarryBit,
        /// The chunk had a boundary tie and a speculative branch was computed
        tied: bool,
    },
}

/// Run the worker protocol for `comm.rank()` to completion.
///
/// # Errors
/// Any receive that fails, times out, or yields the wrong message kind, an
/// assignment whose shape is inconsistent, or a carry value other than 0 or 1.
pub async fn run_worker<C: Communicator>(
    comm: &mut C,
    topology: &Topology,
    scheme: NumberingScheme,
) -> Result<WorkerExit, CommunicationFailure> {
    let rank = comm.rank();
    let started = Instant::now();

    if recv_status(comm).await? == Status::Fail {
        tracing::info!("{}", WorkerAborted { rank: rank.index() });
        return Ok(WorkerExit::Aborted);
    }

    let (a, b) = recv_chunk(comm, &scheme).await?;
    tracing::debug!(
        "{}",
        ChunkReceived {
            rank: rank.index(),
            chunk_length: a.len(),
        }
    );

    let engine = CarryEngine::new(scheme);
    let left = topology.left_neighbor(rank);
    let right = topology.right_neighbor(rank);

    let reduced = engine.reduce(&a, &b);
    let tied = right.is_some() && engine.has_boundary_tie(&a, &b);

    let (carry_in, resolved, forwarded) = match right {
        None => (CarryBit::Zero, reduced, false),
        Some(right) if tied => {
            let tie = BoundaryTieDetected {
                rank: rank.index(),
                chunk_length: a.len(),
            };
            tie.log();
            let (carry_in, resolved) = speculate_while_waiting(comm, engine, reduced, a, b, right)
                .instrument(tie.span("carry_select"))
                .await?;
            (carry_in, resolved, false)
        }
        Some(right) => {
            let outcome = ChunkOutcome::Resolved(reduced);
            let mut forwarded = false;
            if let (Some(left), Some(carry_out)) = (left, outcome.known_carry_out()) {
                send_carry(comm, left, carry_out, true).await?;
                forwarded = true;
            }
            let carry_in = recv_carry(comm, right).await?;
            (carry_in, outcome.resolve(carry_in), forwarded)
        }
    };

    tracing::debug!(
        "{}",
        CarryResolved {
            rank: rank.index(),
            carry_in: carry_in.as_u8(),
            carry_out: resolved.carry_out.as_u8(),
            tied,
        }
    );

    if let (false, Some(left)) = (forwarded, left) {
        send_carry(comm, left, resolved.carry_out, false).await?;
    }

    let carry_out = resolved.carry_out;
    comm.send(
        Rank::COORDINATOR,
        Message::ResultChunk {
            tokens: resolved.digits,
            carry_out: carry_out.as_u8(),
        },
    )
    .await?;

    WorkerFinished {
        rank: rank.index(),
        elapsed: started.elapsed(),
    }
    .log();

    Ok(WorkerExit::Completed {
        carry_in,
        carry_out,
        tied,
    })
}

/// Compute the carry-in-1 branch on the blocking pool while the true carry is
/// received, then select.
async fn speculate_while_waiting<C: Communicator>(
    comm: &mut C,
    engine: CarryEngine,
    reduced: ResolvedChunk,
    a: Vec<Token>,
    b: Vec<Token>,
    right: Rank,
) -> Result<(CarryBit, ResolvedChunk), CommunicationFailure> {
    let rank = comm.rank();
    let speculation = tokio::task::spawn_blocking(move || engine.speculate(&a, &b));

    let (speculated, carry_in) = tokio::join!(speculation, recv_carry(comm, right));
    let carry1 = speculated.map_err(|e| CommunicationFailure::TaskFailed {
        rank: rank.index(),
        reason: format!("speculation task failed: {}", e),
    })?;
    let carry_in = carry_in?;

    let outcome = ChunkOutcome::Tied {
        carry0: reduced,
        carry1,
    };
    Ok((carry_in, outcome.resolve(carry_in)))
}

async fn recv_status<C: Communicator>(comm: &mut C) -> Result<Status, CommunicationFailure> {
    match comm.recv(Rank::COORDINATOR).await? {
        Message::StatusBroadcast { status } => Ok(status),
        other => Err(unexpected(comm.rank(), Rank::COORDINATOR, "StatusBroadcast", &other)),
    }
}

/// Receive the chunk assignment and check its shape against the numbering scheme.
async fn recv_chunk<C: Communicator>(
    comm: &mut C,
    scheme: &NumberingScheme,
) -> Result<(Vec<Token>, Vec<Token>), CommunicationFailure> {
    let rank = comm.rank();
    let (chunk_length, a, b) = match comm.recv(Rank::COORDINATOR).await? {
        Message::ChunkAssignment {
            chunk_length,
            operand_a,
            operand_b,
        } => (chunk_length, operand_a, operand_b),
        other => return Err(unexpected(rank, Rank::COORDINATOR, "ChunkAssignment", &other)),
    };

    let shape_error = |reason: String| CommunicationFailure::ChunkShape {
        rank: rank.index(),
        reason,
    };

    if chunk_length == 0 {
        return Err(shape_error("chunk_length is 0".to_string()));
    }
    if a.len() != chunk_length || b.len() != chunk_length {
        return Err(shape_error(format!(
            "chunk_length {} but operands carry {} and {} tokens",
            chunk_length,
            a.len(),
            b.len()
        )));
    }
    if let Some(token) = a.iter().chain(&b).find(|&&t| t > scheme.max_token()) {
        return Err(shape_error(format!(
            "token {} is not below base {}",
            token,
            scheme.base()
        )));
    }

    Ok((a, b))
}

async fn recv_carry<C: Communicator>(
    comm: &mut C,
    from: Rank,
) -> Result<CarryBit, CommunicationFailure> {
    let rank = comm.rank();
    match comm.recv(from).await? {
        Message::CarrySignal { bit } => CarryBit::try_from(bit).map_err(|value| {
            CommunicationFailure::InvalidCarry {
                rank: rank.index(),
                value,
            }
        }),
        other => Err(unexpected(rank, from, "CarrySignal", &other)),
    }
}

async fn send_carry<C: Communicator>(
    comm: &C,
    to: Rank,
    bit: CarryBit,
    early: bool,
) -> Result<(), CommunicationFailure> {
    comm.send(to, Message::carry(bit)).await?;
    tracing::debug!(
        "{}",
        CarryForwarded {
            rank: comm.rank().index(),
            to: to.index(),
            bit: bit.as_u8(),
            early,
        }
    );
    Ok(())
}

fn unexpected(rank: Rank, peer: Rank, expected: &'static str, found: &Message) -> CommunicationFailure {
    CommunicationFailure::UnexpectedMessage {
        rank: rank.index(),
        peer: peer.index(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LocalProcessGroup;
    use std::time::Duration;

    fn scheme() -> NumberingScheme {
        NumberingScheme::default()
    }

    async fn assign(coordinator: &impl Communicator, to: Rank, a: Vec<Token>, b: Vec<Token>) {
        coordinator
            .send(to, Message::StatusBroadcast { status: Status::Ok })
            .await
            .unwrap();
        coordinator
            .send(
                to,
                Message::ChunkAssignment {
                    chunk_length: a.len(),
                    operand_a: a,
                    operand_b: b,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_single_worker_adds_its_chunk() {
        let topology = Topology::new(1).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let mut worker = group.pop().unwrap();
        let mut coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(1), vec![999_999_999, 5], vec![1, 7]).await;
        let exit = run_worker(&mut worker, &topology, scheme()).await.unwrap();

        assert_eq!(
            exit,
            WorkerExit::Completed {
                carry_in: CarryBit::Zero,
                carry_out: CarryBit::One,
                tied: false,
            }
        );
        assert_eq!(
            coordinator.recv(Rank(1)).await.unwrap(),
            Message::ResultChunk {
                tokens: vec![0, 12],
                carry_out: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_fail_status_aborts_without_result() {
        let topology = Topology::new(1).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, Some(Duration::from_millis(50)));
        let mut worker = group.pop().unwrap();
        let mut coordinator = group.pop().unwrap();

        coordinator
            .send(Rank(1), Message::StatusBroadcast { status: Status::Fail })
            .await
            .unwrap();
        let exit = run_worker(&mut worker, &topology, scheme()).await.unwrap();

        assert_eq!(exit, WorkerExit::Aborted);
        drop(worker);
        assert!(matches!(
            coordinator.recv(Rank(1)).await,
            Err(CommunicationFailure::Disconnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_untied_worker_forwards_carry_before_carry_in() {
        // Rank 2 of 3 with a silent right neighbour: the carry must reach
        // rank 1 even though rank 2 never gets its own carry-in.
        let topology = Topology::new(3).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, Some(Duration::from_millis(50)));
        let _silent = group.pop().unwrap();
        let mut worker = group.pop().unwrap();
        let mut left = group.pop().unwrap();
        let coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(2), vec![999_999_999, 1], vec![1, 2]).await;
        let err = run_worker(&mut worker, &topology, scheme()).await.unwrap_err();

        assert!(matches!(err, CommunicationFailure::Timeout { rank: 2, peer: 3, .. }));
        assert_eq!(left.recv(Rank(2)).await.unwrap(), Message::CarrySignal { bit: 1 });
    }

    #[tokio::test]
    async fn test_tied_worker_selects_speculative_branch() {
        let topology = Topology::new(2).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let right = group.pop().unwrap();
        let mut worker = group.pop().unwrap();
        let mut coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(1), vec![1, 999_999_999], vec![0, 0]).await;
        right.send(Rank(1), Message::carry(CarryBit::One)).await.unwrap();

        let exit = run_worker(&mut worker, &topology, scheme()).await.unwrap();
        assert_eq!(
            exit,
            WorkerExit::Completed {
                carry_in: CarryBit::One,
                carry_out: CarryBit::Zero,
                tied: true,
            }
        );
        assert_eq!(
            coordinator.recv(Rank(1)).await.unwrap(),
            Message::ResultChunk {
                tokens: vec![2, 0],
                carry_out: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_tied_worker_keeps_reduced_branch_on_carry_zero() {
        let topology = Topology::new(2).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let right = group.pop().unwrap();
        let mut worker = group.pop().unwrap();
        let mut coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(1), vec![999_999_999], vec![0]).await;
        right.send(Rank(1), Message::carry(CarryBit::Zero)).await.unwrap();

        run_worker(&mut worker, &topology, scheme()).await.unwrap();
        assert_eq!(
            coordinator.recv(Rank(1)).await.unwrap(),
            Message::ResultChunk {
                tokens: vec![999_999_999],
                carry_out: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_least_significant_worker_never_speculates() {
        let topology = Topology::new(2).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let mut worker = group.pop().unwrap();
        let mut left = group.pop().unwrap();
        let coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(2), vec![999_999_999], vec![0]).await;
        let exit = run_worker(&mut worker, &topology, scheme()).await.unwrap();

        assert!(matches!(exit, WorkerExit::Completed { tied: false, .. }));
        assert_eq!(left.recv(Rank(2)).await.unwrap(), Message::CarrySignal { bit: 0 });
    }

    #[tokio::test]
    async fn test_invalid_carry_value() {
        let topology = Topology::new(2).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let right = group.pop().unwrap();
        let mut worker = group.pop().unwrap();
        let coordinator = group.pop().unwrap();

        assign(&coordinator, Rank(1), vec![3], vec![4]).await;
        right.send(Rank(1), Message::CarrySignal { bit: 7 }).await.unwrap();

        let err = run_worker(&mut worker, &topology, scheme()).await.unwrap_err();
        assert_eq!(err, CommunicationFailure::InvalidCarry { rank: 1, value: 7 });
    }

    #[tokio::test]
    async fn test_malformed_assignment_is_rejected() {
        let topology = Topology::new(1).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let mut worker = group.pop().unwrap();
        let coordinator = group.pop().unwrap();

        coordinator
            .send(Rank(1), Message::StatusBroadcast { status: Status::Ok })
            .await
            .unwrap();
        coordinator
            .send(
                Rank(1),
                Message::ChunkAssignment {
                    chunk_length: 2,
                    operand_a: vec![1, 2],
                    operand_b: vec![3],
                },
            )
            .await
            .unwrap();

        let err = run_worker(&mut worker, &topology, scheme()).await.unwrap_err();
        assert!(matches!(err, CommunicationFailure::ChunkShape { rank: 1, .. }));
    }

    #[tokio::test]
    async fn test_out_of_order_message_is_unexpected() {
        let topology = Topology::new(1).unwrap();
        let mut group = LocalProcessGroup::connect(&topology, None);
        let mut worker = group.pop().unwrap();
        let coordinator = group.pop().unwrap();

        coordinator
            .send(Rank(1), Message::carry(CarryBit::One))
            .await
            .unwrap();

        let err = run_worker(&mut worker, &topology, scheme()).await.unwrap_err();
        assert_eq!(
            err,
            CommunicationFailure::UnexpectedMessage {
                rank: 1,
                peer: 0,
                expected: "StatusBroadcast",
                found: "CarrySignal",
            }
        );
    }
}
