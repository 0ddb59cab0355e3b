// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Token codec: lossless conversion between decimal digit strings and
//! base-B limbs ("tokens"), most significant first.

mod tokens;

pub use tokens::{decode, encode, BigNumber, Token};
