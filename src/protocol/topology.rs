// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::consts::COORDINATOR_RANK;
use crate::errors::ConfigError;

/// A participant's position in the process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl Rank {
    pub const COORDINATOR: Rank = Rank(COORDINATOR_RANK);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rank {}", self.0)
    }
}

/// Rank-to-significance mapping for a process group of `workers + 1` ranks.
///
/// Rank 0 is the coordinator. Worker ranks `1..=workers` own chunks in order
/// of *decreasing* significance:
///
/// ```text
///  chunk:   [ 0 ][ 1 ][ 2 ] ... [ W-1 ]
///  rank:      1    2    3   ...    W
///           most            least significant
///
///  carry signals flow right to left:  W -> W-1 -> ... -> 1
/// ```
///
/// The *left* neighbour of a worker owns the next more significant chunk and
/// receives its carry-out; the *right* neighbour owns the next less
/// significant chunk and supplies its carry-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    workers: usize,
}

impl Topology {
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self { workers })
    }

    /// Number of worker ranks (W = N-1)
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Total ranks including the coordinator (N)
    pub fn world_size(&self) -> usize {
        self.workers + 1
    }

    /// Worker ranks, most significant chunk first
    pub fn worker_ranks(&self) -> impl Iterator<Item = Rank> {
        (1..=self.workers).map(Rank)
    }

    pub fn rank_for_chunk(&self, chunk_index: usize) -> Rank {
        Rank(chunk_index + 1)
    }

    pub fn chunk_for_rank(&self, rank: Rank) -> Option<usize> {
        self.is_worker(rank).then(|| rank.0 - 1)
    }

    pub fn is_worker(&self, rank: Rank) -> bool {
        (1..=self.workers).contains(&rank.0)
    }

    /// Owner of the most significant chunk; its carry-out becomes a leading digit
    pub fn most_significant_worker(&self) -> Rank {
        Rank(1)
    }

    /// Owner of the least significant chunk; its carry-in is always 0
    pub fn least_significant_worker(&self) -> Rank {
        Rank(self.workers)
    }

    /// Neighbour that receives this worker's carry-out, if any
    pub fn left_neighbor(&self, rank: Rank) -> Option<Rank> {
        (self.is_worker(rank) && rank != self.most_significant_worker()).then(|| Rank(rank.0 - 1))
    }

    /// Neighbour that supplies this worker's carry-in, if any
    pub fn right_neighbor(&self, rank: Rank) -> Option<Rank> {
        (self.is_worker(rank) && rank != self.least_significant_worker())
            .then(|| Rank(rank.0 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_one_is_most_significant() {
        let topology = Topology::new(4).unwrap();

        assert_eq!(topology.world_size(), 5);
        assert_eq!(topology.most_significant_worker(), Rank(1));
        assert_eq!(topology.least_significant_worker(), Rank(4));
        assert_eq!(topology.rank_for_chunk(0), Rank(1));
        assert_eq!(topology.chunk_for_rank(Rank(4)), Some(3));
        assert_eq!(topology.chunk_for_rank(Rank::COORDINATOR), None);
    }

    #[test]
    fn test_neighbors() {
        let topology = Topology::new(3).unwrap();

        assert_eq!(topology.left_neighbor(Rank(1)), None);
        assert_eq!(topology.right_neighbor(Rank(1)), Some(Rank(2)));
        assert_eq!(topology.left_neighbor(Rank(3)), Some(Rank(2)));
        assert_eq!(topology.right_neighbor(Rank(3)), None);
        assert_eq!(topology.left_neighbor(Rank::COORDINATOR), None);
        assert_eq!(topology.right_neighbor(Rank(9)), None);
    }

    #[test]
    fn test_single_worker_has_no_neighbors() {
        let topology = Topology::new(1).unwrap();
        assert_eq!(topology.left_neighbor(Rank(1)), None);
        assert_eq!(topology.right_neighbor(Rank(1)), None);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert_eq!(Topology::new(0), Err(ConfigError::ZeroWorkers));
    }
}
