// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Malformed digit strings or tokens seen by the token codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The digit string cannot be cut into whole tokens.
    #[error("Digit string of length {length} is not a multiple of the token width {width}")]
    LengthNotMultiple { length: usize, width: usize },

    /// A character outside `0..=9` was found.
    #[error("Non-digit character {found:?} at position {position}")]
    NonDigit { position: usize, found: char },

    /// A token at or above the numbering base cannot be rendered in the token width.
    #[error("Token {value} at index {index} does not fit the numbering base")]
    TokenOutOfRange { index: usize, value: u32 },
}
