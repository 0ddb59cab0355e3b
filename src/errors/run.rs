// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{CommunicationFailure, ConfigError, FormatError};

/// Any reason a distributed addition run can fail.
#[derive(Error, Debug)]
pub enum AdditionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Communication failure: {0}")]
    Communication(#[from] CommunicationFailure),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdditionError {
    /// True when the run was rejected before any chunk was distributed.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, AdditionError::Config(_) | AdditionError::Format(_))
    }
}
