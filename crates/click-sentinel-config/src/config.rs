// click-sentinel-config/src/config.rs
// ============================================================================
// Module: Click Sentinel Configuration
// Description: Configuration loading and validation for Click Sentinel.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: click-sentinel-core, click-sentinel-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits. Every detection and retrieval tunable is range-checked; invalid
//! configuration fails closed rather than degrading to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use click_sentinel_core::DEFAULT_BUFFER_CAPACITY;
use click_sentinel_core::DEFAULT_CORRELATION_WINDOW_MS;
use click_sentinel_store_sqlite::SqliteStoreMode;
use click_sentinel_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "click-sentinel.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CLICK_SENTINEL_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default server bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8700";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Minimum allowed request body limit in bytes.
const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum allowed request body limit in bytes.
const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Maximum allowed recent-click buffer capacity.
const MAX_BUFFER_CAPACITY: usize = 65_536;
/// Maximum allowed correlation window in milliseconds.
const MAX_CORRELATION_WINDOW_MS: u64 = 60_000;
/// Default retrieval page limit.
const DEFAULT_PAGE_LIMIT: usize = 100;
/// Default upper bound on retrieval page limits.
const DEFAULT_MAX_PAGE_LIMIT: usize = 1_000;
/// Hard ceiling on retrieval page limits.
const MAX_PAGE_LIMIT_CEILING: usize = 10_000;
/// Default busy timeout for the sqlite store in milliseconds.
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Click Sentinel configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickSentinelConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Event store configuration.
    #[serde(default)]
    pub store: EventStoreConfig,
    /// Click detection configuration.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Retrieval pagination configuration.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl ClickSentinelConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        self.detection.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server bind must be a socket address".to_string()))?;
        if self.max_body_bytes < MIN_MAX_BODY_BYTES || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server max_body_bytes must be between {MIN_MAX_BODY_BYTES} and \
                 {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }

    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the address fails to parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server bind must be a socket address".to_string()))
    }
}

// ============================================================================
// SECTION: Store Config
// ============================================================================

/// Event store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStoreType {
    /// In-memory store (nothing survives restart).
    #[default]
    Memory,
    /// `SQLite`-backed durable store.
    Sqlite,
}

/// Event store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EventStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: EventStoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            store_type: EventStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl EventStoreConfig {
    /// Validates event store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            EventStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            EventStoreType::Sqlite => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
                validate_path(path)
            }
        }
    }
}

// ============================================================================
// SECTION: Detection Config
// ============================================================================

/// Click detection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Capacity of the recent pointer-click buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Correlation window in milliseconds.
    #[serde(default = "default_correlation_window_ms")]
    pub correlation_window_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            correlation_window_ms: default_correlation_window_ms(),
        }
    }
}

impl DetectionConfig {
    /// Validates detection configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "detection buffer_capacity must be between 1 and {MAX_BUFFER_CAPACITY}"
            )));
        }
        if self.correlation_window_ms == 0
            || self.correlation_window_ms > MAX_CORRELATION_WINDOW_MS
        {
            return Err(ConfigError::Invalid(format!(
                "detection correlation_window_ms must be between 1 and \
                 {MAX_CORRELATION_WINDOW_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Retrieval Config
// ============================================================================

/// Retrieval pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Page limit applied when a request omits one.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,
    /// Upper bound accepted for request-supplied page limits.
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
        }
    }
}

impl RetrievalConfig {
    /// Validates retrieval configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(ConfigError::Invalid(
                "retrieval page limits must be greater than zero".to_string(),
            ));
        }
        if self.max_page_limit > MAX_PAGE_LIMIT_CEILING {
            return Err(ConfigError::Invalid(format!(
                "retrieval max_page_limit must not exceed {MAX_PAGE_LIMIT_CEILING}"
            )));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(
                "retrieval default_page_limit must not exceed max_page_limit".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default server bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default store busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Returns the default recent-click buffer capacity.
const fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

/// Returns the default correlation window.
const fn default_correlation_window_ms() -> u64 {
    DEFAULT_CORRELATION_WINDOW_MS
}

/// Returns the default retrieval page limit.
const fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// Returns the default retrieval page limit ceiling.
const fn default_max_page_limit() -> usize {
    DEFAULT_MAX_PAGE_LIMIT
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}
