//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into [`ClientConfig`], then applies environment
//! overrides. Defaults live in the DTO itself; nothing here validates.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cy_core::config::ClientConfig;

pub const APP_KEY_ENV: &str = "CROSSYCLIP_APP_KEY";
pub const API_BASE_URL_ENV: &str = "CROSSYCLIP_API_BASE_URL";

/// `<config dir>/crossyclip/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crossyclip").join("config.toml"))
}

/// Load configuration from an explicit path or the default location.
/// 从指定路径或默认位置加载配置
///
/// A missing file at the default location yields defaults; a missing file
/// that was asked for explicitly is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => ClientConfig::default(),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

pub fn read_config_file(path: &Path) -> anyhow::Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ClientConfig::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Blank variables are ignored.
pub fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = non_blank(APP_KEY_ENV) {
        config.account.app_key = key.trim().to_string();
    }
    if let Some(url) = non_blank(API_BASE_URL_ENV) {
        config.account.api_base_url = url.trim().to_string();
    }
}
