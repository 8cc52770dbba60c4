use super::{AccountConfig, PushConfig, SyncConfig};

pub const DEFAULT_API_BASE_URL: &str = "https://api.crossyclip.com";

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            automatic_clipboard_sync: false,
            poll_interval_ms: 1000,
            debounce_ms: 1000,
            lock_timeout_ms: 10_000,
            max_file_size_mb: 100,
            request_timeout_ms: 10_000,
            remote_check_interval_ms: 0,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            reconnect_attempts: 3,
            reconnect_delay_ms: 1000,
            connect_timeout_ms: 5000,
            keepalive_interval_ms: 25_000,
            keepalive_timeout_ms: 30_000,
        }
    }
}
