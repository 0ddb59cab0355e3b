// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log text lives in message structs implementing `Display`, grouped by
//! subsystem under [`messages`], so no call site formats its own strings.
//! [`logging`] installs the `tracing-subscriber` used by the binary.
//!
//! # Usage
//!
//! ```rust
//! use the_carry_chain::observability::messages::worker::BoundaryTieDetected;
//! use the_carry_chain::observability::messages::StructuredLog;
//!
//! let msg = BoundaryTieDetected {
//!     rank: 2,
//!     chunk_length: 4,
//! };
//!
//! msg.log();
//! ```

pub mod logging;
pub mod messages;
