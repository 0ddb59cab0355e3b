// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod codec;          // decimal strings <-> base-B tokens
pub mod config;         // YAML config + numbering scheme
pub mod engine;         // carry engine, coordinator, workers
pub mod errors;         // error handling
pub mod observability;
pub mod partition;      // chunk partitioner
pub mod protocol;       // ranks, messages, communicator
pub mod storage;        // input records and result files
