// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod numbering;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, Config, LoggingConfig, NumberingConfig,
    PartitionConfig, TransportConfig,
};
pub use numbering::NumberingScheme;
pub use validation::validate_config;
