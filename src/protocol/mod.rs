// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Point-to-point protocol between the coordinator and the worker ranks.
//!
//! * `topology` - ranks and the explicit rank-to-significance mapping
//! * `messages` - the logical messages exchanged during one run
//! * `communicator` - the send/receive seam and its in-process implementation

pub mod communicator;
pub mod messages;
pub mod topology;

pub use communicator::{Communicator, LocalCommunicator, LocalProcessGroup};
pub use messages::{CarryBit, Message, Status};
pub use topology::{Rank, Topology};
