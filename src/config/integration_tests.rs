// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use crate::config::load_and_validate_config;
    use crate::engine::LocalCluster;
    use crate::errors::ConfigError;
    use crate::partition::RemainderPolicy;

    /// Test that the shipped default configuration loads
    #[test]
    fn test_default_yaml_loading() {
        let config = load_and_validate_config("configs/default.yaml").unwrap();

        assert_eq!(config.workers, 2);
        assert_eq!(config.numbering.token_width, 9);
        assert_eq!(config.partition.remainder, RemainderPolicy::Reject);
        assert_eq!(config.transport.receive_timeout(), None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_timeout_yaml_loading() {
        let config = load_and_validate_config("configs/four-workers-timeout.yaml").unwrap();

        assert_eq!(config.workers, 4);
        assert_eq!(
            config.transport.receive_timeout(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_token_width_yaml_is_rejected() {
        let err = load_and_validate_config("configs/invalid-token-width.yaml").unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedTokenWidth { width: 10 });
    }

    /// A loaded configuration drives a whole run end to end
    #[tokio::test]
    async fn test_small_token_config_runs() {
        let config = load_and_validate_config("configs/small-tokens-truncate.yaml").unwrap();
        let cluster = LocalCluster::new(&config).unwrap();
        assert_eq!(cluster.scheme().base(), 10_000);

        // 7 tokens over 3 workers: the last token is dropped.
        let sum = cluster
            .add(
                "0001999999999999999999990005",
                "0000000000000000000000010003",
            )
            .await
            .unwrap();
        assert_eq!(sum.digits, "000200000000000000000000");
        assert!(!sum.carry_out);
    }
}
