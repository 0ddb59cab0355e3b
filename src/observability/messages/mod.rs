// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `config` - configuration loading and validation
//! * `coordinator` - run lifecycle on rank 0 (distribution, collection, assembly)
//! * `worker` - per-rank carry protocol events
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_carry_chain::observability::messages::coordinator::RunStarted;
//!
//! let msg = RunStarted {
//!     workers: 4,
//!     tokens: 16,
//!     token_width: 9,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod config;
pub mod coordinator;
pub mod worker;

/// A message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event with its fields attached
    fn log(&self);

    /// Open a span carrying the message's fields
    fn span(&self, name: &str) -> Span;
}
