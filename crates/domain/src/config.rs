//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_OPERATION_TIMEOUT_MS, DEFAULT_POOL_SIZE, DEFAULT_STORE_IDENTIFIER,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Select the in-process backend over the durable one.
    #[serde(default)]
    pub use_transient_store: bool,
    /// Handle of the durable store (SQLite database file).
    #[serde(default = "default_store_identifier")]
    pub store_identifier: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Per-operation storage deadline. Zero disables it.
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

/// HTTP surface configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Used only to compose shareable links.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self { storage: StorageConfig::default(), server: ServerConfig::default() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            use_transient_store: false,
            store_identifier: default_store_identifier(),
            pool_size: default_pool_size(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: default_bind_address(), public_base_url: None }
    }
}

fn default_store_identifier() -> String {
    DEFAULT_STORE_IDENTIFIER.to_string()
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_operation_timeout_ms() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_MS
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}
