//! # Client configuration / 客户端配置
//!
//! TOML → DTO mapping plus the documented defaults. Every section and field is
//! optional in the file; missing values fall back to [`Default`].

mod defaults;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

pub use defaults::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub account: AccountConfig,
    pub sync: SyncConfig,
    pub push: PushConfig,
    pub logging: LoggingConfig,
}

/// Credentials for the cloud clipboard service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Empty means "not configured"; automatic sync stays inactive.
    pub app_key: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub automatic_clipboard_sync: bool,
    pub poll_interval_ms: u64,
    pub debounce_ms: u64,
    pub lock_timeout_ms: u64,
    pub max_file_size_mb: u64,
    pub request_timeout_ms: u64,
    /// 0 disables the periodic remote check.
    pub remote_check_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub reconnect_attempts: u32,
    pub reconnect_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub keepalive_interval_ms: u64,
    pub keepalive_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
}

impl ClientConfig {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn has_credentials(&self) -> bool {
        !self.account.app_key.trim().is_empty()
    }

    /// Automatic sync runs only when enabled and an app key is present.
    pub fn automatic_sync_active(&self) -> bool {
        self.sync.automatic_clipboard_sync && self.has_credentials()
    }
}

impl SyncConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn remote_check_interval(&self) -> Option<Duration> {
        (self.remote_check_interval_ms > 0)
            .then(|| Duration::from_millis(self.remote_check_interval_ms))
    }
}

impl PushConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.reconnect_attempts,
            Duration::from_millis(self.reconnect_delay_ms),
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_millis(self.keepalive_interval_ms)
    }

    pub fn keepalive_timeout(&self) -> Duration {
        Duration::from_millis(self.keepalive_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.account.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.sync.automatic_clipboard_sync);
        assert_eq!(config.sync.max_file_size_bytes(), 100 * 1024 * 1024);
        assert!(config.sync.remote_check_interval().is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            [account]
            app_key = "k-123"

            [sync]
            automatic_clipboard_sync = true
            remote_check_interval_ms = 5000
            "#,
        )
        .unwrap();

        assert!(config.automatic_sync_active());
        assert_eq!(config.sync.poll_interval_ms, 1000);
        assert_eq!(
            config.sync.remote_check_interval(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(config.push.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn enabled_without_key_is_inactive() {
        let config = ClientConfig::from_toml(
            r#"
            [account]
            app_key = "   "
            [sync]
            automatic_clipboard_sync = true
            "#,
        )
        .unwrap();
        assert!(!config.automatic_sync_active());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ClientConfig::from_toml("[sync\npoll = ").is_err());
    }
}
