// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod carry;
pub mod cluster;
pub mod coordinator;
pub mod worker;

pub use carry::{CarryEngine, ChunkOutcome, ResolvedChunk};
pub use cluster::LocalCluster;
pub use coordinator::{run_coordinator, AdditionRequest, AdditionResult, CoordinatorSettings};
pub use worker::{run_worker, WorkerExit};
