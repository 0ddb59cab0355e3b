// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_TOKEN_WIDTH, MAX_TOKEN_WIDTH};
use crate::errors::ConfigError;

/// The fixed token width and base shared by every component of a run.
///
/// Built once from configuration and passed by value (`Copy`); nothing in the
/// crate hard-codes `9` or `10^9`.
///
/// # Example
/// ```
/// use the_carry_chain::config::NumberingScheme;
///
/// let scheme = NumberingScheme::default();
/// assert_eq!(scheme.token_width(), 9);
/// assert_eq!(scheme.base(), 1_000_000_000);
/// assert_eq!(scheme.max_token(), 999_999_999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingScheme {
    token_width: usize,
    base: u32,
}

impl NumberingScheme {
    /// Create a scheme for `token_width` decimal digits per token.
    pub fn new(token_width: usize) -> Result<Self, ConfigError> {
        if token_width == 0 || token_width > MAX_TOKEN_WIDTH {
            return Err(ConfigError::UnsupportedTokenWidth { width: token_width });
        }
        Ok(Self {
            token_width,
            base: 10u32.pow(token_width as u32),
        })
    }

    pub fn token_width(&self) -> usize {
        self.token_width
    }

    /// B, the value one past the largest token
    pub fn base(&self) -> u32 {
        self.base
    }

    /// B-1, the boundary value a tie is detected against
    pub fn max_token(&self) -> u32 {
        self.base - 1
    }
}

impl Default for NumberingScheme {
    fn default() -> Self {
        Self {
            token_width: DEFAULT_TOKEN_WIDTH,
            base: 10u32.pow(DEFAULT_TOKEN_WIDTH as u32),
        }
    }
}
