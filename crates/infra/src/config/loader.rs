//! Configuration loader
//!
//! Loads application configuration from environment variables and files.
//!
//! ## Loading Strategy
//! 1. Start from a probed config file if one exists, otherwise defaults
//! 2. Apply any `BFFHANG_*` environment variables on top
//! 3. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BFFHANG_USE_MEMORY_STORE`: Use the in-process store (true/false)
//! - `BFFHANG_STORE`: Durable store handle (SQLite file path)
//! - `BFFHANG_DB_POOL_SIZE`: Connection pool size
//! - `BFFHANG_OP_TIMEOUT_MS`: Per-operation storage deadline, 0 disables
//! - `BFFHANG_BIND_ADDR`: HTTP listen address
//! - `BFFHANG_BASE_URL`: Public base URL used for share links
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./bffhang.json` or `./bffhang.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use bffhang_domain::{Config, HangError, Result};

pub const ENV_USE_MEMORY_STORE: &str = "BFFHANG_USE_MEMORY_STORE";
pub const ENV_STORE: &str = "BFFHANG_STORE";
pub const ENV_DB_POOL_SIZE: &str = "BFFHANG_DB_POOL_SIZE";
pub const ENV_OP_TIMEOUT_MS: &str = "BFFHANG_OP_TIMEOUT_MS";
pub const ENV_BIND_ADDR: &str = "BFFHANG_BIND_ADDR";
pub const ENV_BASE_URL: &str = "BFFHANG_BASE_URL";

/// Load configuration: probed file (or defaults), then environment overrides.
///
/// # Errors
/// Returns `HangError::Config` if a config file exists but cannot be parsed,
/// or if an environment variable holds an invalid value.
pub fn load() -> Result<Config> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            Config::default()
        }
    };

    apply_env_overrides(base)
}

/// Defaults overridden by whatever `BFFHANG_*` variables are set.
///
/// # Errors
/// Returns `HangError::Config` for unparsable numeric values.
pub fn load_from_env() -> Result<Config> {
    apply_env_overrides(Config::default())
}

/// Overlay environment variables onto `config`.
///
/// # Errors
/// Returns `HangError::Config` for unparsable numeric values.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    let mut applied = 0usize;

    if let Some(value) = env_bool(ENV_USE_MEMORY_STORE) {
        config.storage.use_transient_store = value;
        applied += 1;
    }
    if let Some(value) = env_string(ENV_STORE) {
        config.storage.store_identifier = value;
        applied += 1;
    }
    if let Some(value) = env_parse::<u32>(ENV_DB_POOL_SIZE, "pool size")? {
        config.storage.pool_size = value;
        applied += 1;
    }
    if let Some(value) = env_parse::<u64>(ENV_OP_TIMEOUT_MS, "operation timeout")? {
        config.storage.operation_timeout_ms = value;
        applied += 1;
    }
    if let Some(value) = env_string(ENV_BIND_ADDR) {
        config.server.bind_address = value;
        applied += 1;
    }
    if let Some(value) = env_string(ENV_BASE_URL) {
        config.server.public_base_url = Some(value.trim_end_matches('/').to_string());
        applied += 1;
    }

    if applied > 0 {
        tracing::info!(overrides = applied, "Configuration overrides loaded from environment");
    }
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HangError::Config` if:
/// - The file does not exist
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HangError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HangError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HangError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HangError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HangError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HangError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "bffhang.json", "bffhang.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(names.iter().map(|name| cwd.join(name)));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(names.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

/// Non-blank environment variable.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Any other set value counts as `false`.
fn env_bool(key: &str) -> Option<bool> {
    env_string(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|s| s.parse::<T>().map_err(|e| HangError::Config(format!("Invalid {what}: {e}"))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        ENV_USE_MEMORY_STORE,
        ENV_STORE,
        ENV_DB_POOL_SIZE,
        ENV_OP_TIMEOUT_MS,
        ENV_BIND_ADDR,
        ENV_BASE_URL,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        for (raw, expected) in [("1", true), ("TRUE", true), ("on", true), ("no", false), ("0", false)]
        {
            std::env::set_var(ENV_USE_MEMORY_STORE, raw);
            assert_eq!(env_bool(ENV_USE_MEMORY_STORE), Some(expected), "value {raw}");
        }
        std::env::remove_var(ENV_USE_MEMORY_STORE);
        assert_eq!(env_bool(ENV_USE_MEMORY_STORE), None);
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_USE_MEMORY_STORE, "true");
        std::env::set_var(ENV_DB_POOL_SIZE, "9");
        std::env::set_var(ENV_BASE_URL, "https://hang.example/");

        let config = load_from_env().unwrap();
        assert!(config.storage.use_transient_store);
        assert_eq!(config.storage.pool_size, 9);
        assert_eq!(config.storage.store_identifier, Config::default().storage.store_identifier);
        assert_eq!(config.server.public_base_url.as_deref(), Some("https://hang.example"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_rejects_bad_numbers() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_OP_TIMEOUT_MS, "soon");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, HangError::Config(msg) if msg.contains("operation timeout")));

        clear_env();
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let path = PathBuf::from("test.toml");
        let from_file =
            parse_config("[storage]\nstore_identifier = \"file.db\"\npool_size = 2\n", &path)
                .unwrap();

        std::env::set_var(ENV_STORE, "env.db");
        let config = apply_env_overrides(from_file).unwrap();
        assert_eq!(config.storage.store_identifier, "env.db");
        assert_eq!(config.storage.pool_size, 2);

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "storage": {
                "use_transient_store": false,
                "store_identifier": "test.db",
                "pool_size": 4,
                "operation_timeout_ms": 250
            },
            "server": {
                "bind_address": "127.0.0.1:9000"
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("Should load config from JSON file");
        assert_eq!(config.storage.store_identifier, "test.db");
        assert_eq!(config.storage.operation_timeout_ms, 250);
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert!(config.server.public_base_url.is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(HangError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_fills_defaults() {
        let path = PathBuf::from("test.toml");
        let config = parse_config("[storage]\nuse_transient_store = true\n", &path).unwrap();
        assert!(config.storage.use_transient_store);
        assert_eq!(config.storage.pool_size, Config::default().storage.pool_size);
        assert_eq!(config.server, Config::default().server);
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let path = PathBuf::from("test.json");
        assert!(parse_config(r#"{ "storage": "#, &path).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let path = PathBuf::from("test.yaml");
        assert!(parse_config("some content", &path).is_err(), "Should fail with unsupported format");
    }
}
