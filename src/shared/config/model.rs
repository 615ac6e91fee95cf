use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_addr: String,
    /// Keep HTTP/1.1 connections open between requests
    #[serde(default)]
    pub keep_alive: bool,
    /// Concurrent connection cap; 0 or unset means unlimited
    #[serde(default)]
    pub max_connections: Option<usize>,
    /// Requests in flight before new ones get 503
    #[serde(default = "default_max_inflight_requests")]
    pub max_inflight_requests: usize,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// How long to let open connections drain after shutdown is signalled
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_max_inflight_requests() -> usize {
    1024
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_shutdown_grace_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file with the five tables to load at startup
    pub seed_path: String,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("MARQUEE_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Loads `path` (extension optional) and applies `MARQUEE__SECTION__KEY`
/// environment overrides on top.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix("MARQUEE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
