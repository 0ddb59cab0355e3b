// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-process process group bootstrap.
//!
//! [`LocalCluster`] wires one coordinator and `W` workers onto a
//! [`LocalProcessGroup`] and runs every rank as its own tokio task. The first
//! rank to fail cancels the others so the run never waits on a rank that will
//! not answer. Rejected input is not a failure in that sense: the coordinator
//! broadcasts `fail` and the workers leave on their own.
//!
//! Only the coordinator's task touches the output file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::{Config, NumberingScheme};
use crate::engine::coordinator::{
    run_coordinator, AdditionRequest, AdditionResult, CoordinatorSettings,
};
use crate::engine::worker::{run_worker, WorkerExit};
use crate::errors::{AdditionError, CommunicationFailure, ConfigError};
use crate::observability::messages::coordinator::ResultPersisted;
use crate::observability::messages::worker::RankFailed;
use crate::protocol::{Communicator, LocalCommunicator, LocalProcessGroup, Rank, Topology};
use crate::storage::{load_input, persist_result, InputRecord};

/// A coordinator plus `W` workers running as tasks in this process.
#[derive(Debug, Clone)]
pub struct LocalCluster {
    topology: Topology,
    settings: CoordinatorSettings,
    receive_timeout: Option<Duration>,
}

impl LocalCluster {
    /// Build a cluster from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            topology: Topology::new(config.workers)?,
            settings: CoordinatorSettings {
                scheme: config.scheme()?,
                remainder: config.partition.remainder,
            },
            receive_timeout: config.transport.receive_timeout(),
        })
    }

    pub fn scheme(&self) -> &NumberingScheme {
        &self.settings.scheme
    }

    /// Add two zero-padded decimal strings.
    ///
    /// # Example
    /// ```
    /// use the_carry_chain::config::Config;
    /// use the_carry_chain::engine::LocalCluster;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let cluster = LocalCluster::new(&Config::default().with_workers(2)).unwrap();
    /// let sum = cluster
    ///     .add("000000001999999999", "000000000000000001")
    ///     .await
    ///     .unwrap();
    /// assert_eq!(sum.digits, "000000002000000000");
    /// # }
    /// ```
    pub async fn add(&self, first: &str, second: &str) -> Result<AdditionResult, AdditionError> {
        self.run(AdditionRequest::new(first, second), None).await
    }

    /// Add the operands of a parsed input record, checking its declared length.
    pub async fn add_record(&self, record: InputRecord) -> Result<AdditionResult, AdditionError> {
        self.run(record.into(), None).await
    }

    /// Read an input record from `input`, add it, and write the sum to `output`.
    pub async fn run_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<AdditionResult, AdditionError> {
        let record = load_input(input)?;
        self.run(record.into(), Some(output.as_ref().to_path_buf()))
            .await
    }

    /// Spawn every rank, wait for all of them, and report the run's outcome.
    ///
    /// When several ranks fail, the root cause wins over the disconnects and
    /// cancellations it triggers in other ranks.
    pub async fn run(
        &self,
        request: AdditionRequest,
        output: Option<PathBuf>,
    ) -> Result<AdditionResult, AdditionError> {
        let mut group = LocalProcessGroup::connect(&self.topology, self.receive_timeout)
            .into_iter();
        let cancellation_token = CancellationToken::new();

        let Some(coordinator_comm) = group.next() else {
            return Err(CommunicationFailure::TaskFailed {
                rank: Rank::COORDINATOR.index(),
                reason: "process group has no coordinator rank".to_string(),
            }
            .into());
        };
        let coordinator = self.spawn_coordinator(
            coordinator_comm,
            request,
            output,
            cancellation_token.clone(),
        );

        let workers: Vec<(Rank, JoinHandle<Result<WorkerExit, CommunicationFailure>>)> = group
            .map(|comm| {
                let rank = comm.rank();
                (rank, self.spawn_worker(comm, cancellation_token.clone()))
            })
            .collect();

        let mut errors: Vec<AdditionError> = Vec::new();

        let result = match coordinator.await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                errors.push(e);
                None
            }
            Err(e) => {
                errors.push(join_failure(Rank::COORDINATOR, e));
                None
            }
        };

        for (rank, task) in workers {
            match task.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => errors.push(e.into()),
                Err(e) => errors.push(join_failure(rank, e)),
            }
        }

        match (result, root_cause(errors)) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Err(CommunicationFailure::TaskFailed {
                rank: Rank::COORDINATOR.index(),
                reason: "coordinator finished without a result".to_string(),
            }
            .into()),
        }
    }

    fn spawn_coordinator(
        &self,
        mut comm: LocalCommunicator,
        request: AdditionRequest,
        output: Option<PathBuf>,
        cancellation_token: CancellationToken,
    ) -> JoinHandle<Result<AdditionResult, AdditionError>> {
        let topology = self.topology;
        let settings = self.settings;
        let span = tracing::info_span!("coordinator", rank = Rank::COORDINATOR.index());

        tokio::spawn(
            async move {
                let outcome = tokio::select! {
                    _ = cancellation_token.cancelled() => {
                        Err(AdditionError::from(CommunicationFailure::Cancelled {
                            rank: Rank::COORDINATOR.index(),
                        }))
                    }
                    outcome = run_coordinator(&mut comm, &topology, &request, settings) => outcome,
                };

                let result = match outcome {
                    Ok(result) => result,
                    Err(e) => {
                        if !e.is_rejected_input() && !is_cancellation(&e) {
                            tracing::error!(
                                "{}",
                                RankFailed {
                                    rank: Rank::COORDINATOR.index(),
                                    error: &e,
                                }
                            );
                            cancellation_token.cancel();
                        }
                        return Err(e);
                    }
                };

                if let Some(path) = output {
                    persist_result(&path, &result.digits)?;
                    tracing::info!(
                        "{}",
                        ResultPersisted {
                            path: &path.display().to_string(),
                            digits: result.digits.len(),
                        }
                    );
                }
                Ok(result)
            }
            .instrument(span),
        )
    }

    fn spawn_worker(
        &self,
        mut comm: LocalCommunicator,
        cancellation_token: CancellationToken,
    ) -> JoinHandle<Result<WorkerExit, CommunicationFailure>> {
        let topology = self.topology;
        let scheme = self.settings.scheme;
        let rank = comm.rank();
        let span = tracing::info_span!("worker", rank = rank.index());

        tokio::spawn(
            async move {
                let outcome = tokio::select! {
                    _ = cancellation_token.cancelled() => {
                        Err(CommunicationFailure::Cancelled { rank: rank.index() })
                    }
                    outcome = run_worker(&mut comm, &topology, scheme) => outcome,
                };

                if let Err(e) = &outcome {
                    if !matches!(e, CommunicationFailure::Cancelled { .. }) {
                        tracing::error!("{}", RankFailed { rank: rank.index(), error: e });
                        cancellation_token.cancel();
                    }
                }
                outcome
            }
            .instrument(span),
        )
    }
}

fn join_failure(rank: Rank, error: tokio::task::JoinError) -> AdditionError {
    CommunicationFailure::TaskFailed {
        rank: rank.index(),
        reason: format!("task join failed: {}", error),
    }
    .into()
}

fn is_cancellation(error: &AdditionError) -> bool {
    matches!(
        error,
        AdditionError::Communication(CommunicationFailure::Cancelled { .. })
    )
}

/// Pick the error that explains the run: anything before a dropped channel,
/// and a dropped channel before a cancellation. Ties go to the lowest rank.
fn root_cause(errors: Vec<AdditionError>) -> Option<AdditionError> {
    errors.into_iter().min_by_key(|error| match error {
        AdditionError::Communication(CommunicationFailure::Cancelled { .. }) => 2,
        AdditionError::Communication(CommunicationFailure::Disconnected { .. }) => 1,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_workers() {
        let err = LocalCluster::new(&Config::default().with_workers(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_new_rejects_unsupported_token_width() {
        let mut config = Config::default();
        config.numbering.token_width = 12;
        let err = LocalCluster::new(&config).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedTokenWidth { width: 12 });
    }

    #[test]
    fn test_root_cause_prefers_real_failure() {
        let errors = vec![
            CommunicationFailure::Cancelled { rank: 0 }.into(),
            CommunicationFailure::Disconnected { rank: 1, peer: 2 }.into(),
            CommunicationFailure::InvalidCarry { rank: 2, value: 9 }.into(),
        ];
        let cause = root_cause(errors).unwrap();
        assert!(matches!(
            cause,
            AdditionError::Communication(CommunicationFailure::InvalidCarry { rank: 2, value: 9 })
        ));
    }

    #[test]
    fn test_root_cause_keeps_first_of_equal_rank() {
        let errors = vec![
            CommunicationFailure::Disconnected { rank: 0, peer: 1 }.into(),
            CommunicationFailure::Disconnected { rank: 2, peer: 1 }.into(),
        ];
        let cause = root_cause(errors).unwrap();
        assert!(matches!(
            cause,
            AdditionError::Communication(CommunicationFailure::Disconnected { rank: 0, .. })
        ));
    }

    #[test]
    fn test_root_cause_of_nothing() {
        assert!(root_cause(Vec::new()).is_none());
    }
}
