// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors detected by the coordinator before any chunk is distributed.
///
/// A `ConfigError` always aborts the run through the `StatusBroadcast{fail}`
/// path, so no worker performs partial computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The process group has no worker ranks
    ZeroWorkers,
    /// Token width outside what a `u32` limb can carry
    UnsupportedTokenWidth {
        width: usize,
    },
    /// The two operands do not have the same number of tokens
    OperandLengthMismatch {
        first: usize,
        second: usize,
    },
    /// An input record declares a token length that its operands do not have
    DeclaredLengthMismatch {
        declared: usize,
        actual: usize,
    },
    /// Fewer tokens than workers, which would give some worker an empty chunk
    TooFewTokens {
        tokens: usize,
        workers: usize,
    },
    /// Token count is not a multiple of the worker count under the `reject` policy
    UnevenPartition {
        tokens: usize,
        workers: usize,
    },
    /// An input record could not be parsed
    InvalidRecord {
        reason: String,
    },
    /// A configuration or input file could not be read or parsed
    Load {
        path: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWorkers => {
                write!(f, "At least one worker rank is required")
            }
            ConfigError::UnsupportedTokenWidth { width } => {
                write!(
                    f,
                    "Token width {} is not supported; expected a width between 1 and 9",
                    width
                )
            }
            ConfigError::OperandLengthMismatch { first, second } => {
                write!(
                    f,
                    "Operands must have equal length: first has {} tokens, second has {}",
                    first, second
                )
            }
            ConfigError::DeclaredLengthMismatch { declared, actual } => {
                write!(
                    f,
                    "Input declares {} tokens per operand but the operands hold {}",
                    declared, actual
                )
            }
            ConfigError::TooFewTokens { tokens, workers } => {
                write!(
                    f,
                    "Cannot split {} tokens across {} workers without an empty chunk",
                    tokens, workers
                )
            }
            ConfigError::UnevenPartition { tokens, workers } => {
                write!(
                    f,
                    "{} tokens do not divide evenly across {} workers ({} would be dropped)",
                    tokens,
                    workers,
                    tokens % workers
                )
            }
            ConfigError::InvalidRecord { reason } => {
                write!(f, "Invalid input record: {}", reason)
            }
            ConfigError::Load { path, reason } => {
                write!(f, "Failed to load '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_mismatch_counts_tokens() {
        let err = ConfigError::OperandLengthMismatch {
            first: 2,
            second: 1,
        };
        assert_eq!(
            err.to_string(),
            "Operands must have equal length: first has 2 tokens, second has 1"
        );
    }

    #[test]
    fn test_uneven_partition_reports_dropped_tokens() {
        let err = ConfigError::UnevenPartition {
            tokens: 7,
            workers: 3,
        };
        assert_eq!(
            err.to_string(),
            "7 tokens do not divide evenly across 3 workers (1 would be dropped)"
        );
    }

    #[test]
    fn test_too_few_tokens_display() {
        let err = ConfigError::TooFewTokens {
            tokens: 1,
            workers: 2,
        };
        assert!(err.to_string().contains("without an empty chunk"));
    }
}
