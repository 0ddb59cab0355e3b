// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod communication;
mod config;
mod format;
mod run;

pub use communication::CommunicationFailure;
pub use config::ConfigError;
pub use format::FormatError;
pub use run::AdditionError;
