// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Only checks what is knowable before the operands are seen: a non-empty
//! worker set and a token width a `u32` limb can hold. Operand-dependent
//! checks (lengths, divisibility) happen in the coordinator before any chunk
//! is sent.

use crate::config::Config;
use crate::errors::ConfigError;

/// Validate a configuration, collecting every problem found.
///
/// # Example
/// ```
/// use the_carry_chain::config::{validate_config, Config};
///
/// let config = Config::default().with_workers(0);
/// let errors = validate_config(&config).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if cfg.workers == 0 {
        errors.push(ConfigError::ZeroWorkers);
    }

    if let Err(e) = cfg.scheme() {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut cfg = Config::default().with_workers(0);
        cfg.numbering.token_width = 12;

        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigError::ZeroWorkers,
                ConfigError::UnsupportedTokenWidth { width: 12 }
            ]
        );
    }
}
