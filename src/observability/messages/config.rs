// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::errors::ConfigError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration file loaded and validated.
///
/// # Log Level
/// `info!`
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub workers: usize,
    pub token_width: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration from '{}': workers={}, token_width={}",
            self.path, self.workers, self.token_width
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            workers = self.workers,
            token_width = self.token_width,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_loaded",
            span_name = name,
            path = self.path,
            workers = self.workers,
        )
    }
}

/// Configuration file failed validation.
///
/// # Log Level
/// `error!`
pub struct ConfigRejected<'a> {
    pub path: &'a str,
    pub error: &'a ConfigError,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration '{}' rejected: {}", self.path, self.error)
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(
            path = self.path,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            path = self.path,
            error = %self.error,
        )
    }
}
