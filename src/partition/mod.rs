// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Chunk partitioner.
//!
//! Splits two equal-length operands into position-aligned chunk pairs, one per
//! worker. Chunk 0 is the most significant and goes to the most significant
//! worker rank; see [`Topology`] for the rank mapping.

use serde::Deserialize;

use crate::codec::{BigNumber, Token};
use crate::errors::ConfigError;
use crate::protocol::{Rank, Topology};

/// What to do with trailing tokens when the token count is not a multiple of
/// the worker count.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Refuse the run with `ConfigError::UnevenPartition`.
    #[default]
    Reject,
    /// Silently drop the trailing (least significant) tokens.
    Truncate,
}

/// Both operands' tokens for one position range, owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPair {
    /// Position of the chunk, 0 = most significant
    pub index: usize,
    /// Worker rank that owns the chunk
    pub rank: Rank,
    pub first: Vec<Token>,
    pub second: Vec<Token>,
}

impl ChunkPair {
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Number of tokens each worker receives for `tokens` total tokens.
///
/// Rejects empty chunks always and uneven splits under `RemainderPolicy::Reject`.
pub fn tokens_per_chunk(
    tokens: usize,
    workers: usize,
    policy: RemainderPolicy,
) -> Result<usize, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if tokens < workers {
        return Err(ConfigError::TooFewTokens { tokens, workers });
    }
    if tokens % workers != 0 && policy == RemainderPolicy::Reject {
        return Err(ConfigError::UnevenPartition { tokens, workers });
    }
    Ok(tokens / workers)
}

/// Split both operands into `topology.workers()` chunk pairs.
///
/// Chunk `i` covers tokens `[i*T, (i+1)*T)` of both operands and is assigned to
/// `topology.rank_for_chunk(i)`.
///
/// # Example
/// ```
/// use the_carry_chain::codec::BigNumber;
/// use the_carry_chain::partition::{partition, RemainderPolicy};
/// use the_carry_chain::protocol::{Rank, Topology};
///
/// let a = BigNumber::from(vec![1, 2, 3, 4]);
/// let b = BigNumber::from(vec![5, 6, 7, 8]);
/// let topology = Topology::new(2).unwrap();
///
/// let chunks = partition(&a, &b, &topology, RemainderPolicy::Reject).unwrap();
/// assert_eq!(chunks[0].rank, Rank(1));
/// assert_eq!(chunks[0].first, vec![1, 2]);
/// assert_eq!(chunks[1].second, vec![7, 8]);
/// ```
pub fn partition(
    first: &BigNumber,
    second: &BigNumber,
    topology: &Topology,
    policy: RemainderPolicy,
) -> Result<Vec<ChunkPair>, ConfigError> {
    if first.len() != second.len() {
        return Err(ConfigError::OperandLengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }

    let workers = topology.workers();
    let chunk_len = tokens_per_chunk(first.len(), workers, policy)?;

    let chunks = (0..workers)
        .map(|index| {
            let range = index * chunk_len..(index + 1) * chunk_len;
            ChunkPair {
                index,
                rank: topology.rank_for_chunk(index),
                first: first.tokens()[range.clone()].to_vec(),
                second: second.tokens()[range].to_vec(),
            }
        })
        .collect();

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: u32) -> (BigNumber, BigNumber) {
        let a = BigNumber::from((0..n).collect::<Vec<_>>());
        let b = BigNumber::from((100..100 + n).collect::<Vec<_>>());
        (a, b)
    }

    #[test]
    fn test_chunks_are_contiguous_and_ordered_by_rank() {
        let (a, b) = numbers(6);
        let topology = Topology::new(3).unwrap();

        let chunks = partition(&a, &b, &topology, RemainderPolicy::Reject).unwrap();

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.rank, Rank(i + 1));
            assert_eq!(chunk.len(), 2);
        }
        let rebuilt: Vec<Token> = chunks.iter().flat_map(|c| c.first.clone()).collect();
        assert_eq!(rebuilt, a.0);
        assert_eq!(chunks[2].second, vec![104, 105]);
    }

    #[test]
    fn test_reject_policy_refuses_remainder() {
        let (a, b) = numbers(7);
        let topology = Topology::new(3).unwrap();

        let err = partition(&a, &b, &topology, RemainderPolicy::Reject).unwrap_err();
        assert_eq!(err, ConfigError::UnevenPartition { tokens: 7, workers: 3 });
    }

    #[test]
    fn test_truncate_policy_drops_trailing_tokens() {
        let (a, b) = numbers(7);
        let topology = Topology::new(3).unwrap();

        let chunks = partition(&a, &b, &topology, RemainderPolicy::Truncate).unwrap();
        let covered: Vec<Token> = chunks.iter().flat_map(|c| c.first.clone()).collect();
        assert_eq!(covered, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_chunks_are_rejected_under_any_policy() {
        let (a, b) = numbers(2);
        let topology = Topology::new(3).unwrap();

        for policy in [RemainderPolicy::Reject, RemainderPolicy::Truncate] {
            let err = partition(&a, &b, &topology, policy).unwrap_err();
            assert_eq!(err, ConfigError::TooFewTokens { tokens: 2, workers: 3 });
        }
    }

    #[test]
    fn test_mismatched_operands() {
        let a = BigNumber::from(vec![1, 2]);
        let b = BigNumber::from(vec![1]);
        let topology = Topology::new(1).unwrap();

        assert_eq!(
            partition(&a, &b, &topology, RemainderPolicy::Reject).unwrap_err(),
            ConfigError::OperandLengthMismatch { first: 2, second: 1 }
        );
    }
}
