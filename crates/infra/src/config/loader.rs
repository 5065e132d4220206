//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If none are set, falls back to a probed config file
//! 3. If no file exists, uses [`ClientConfig::default`]
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `DUOADMIN_TIMEOUT_SECS`: Per-exchange timeout in seconds
//! - `DUOADMIN_USER_AGENT`: User agent sent with every request
//! - `DUOADMIN_MAX_ATTEMPTS`: Total attempts for idempotent requests
//! - `DUOADMIN_BASE_BACKOFF_MS`: First retry delay in milliseconds
//! - `DUOADMIN_CREDENTIAL_PATH`: Encrypted credential file location
//!
//! Credentials are read separately by [`credentials_from_env`] from
//! `DUOADMIN_IKEY`, `DUOADMIN_SKEY` and `DUOADMIN_HOST`.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./duoadmin.toml` or `./duoadmin.json` (current working directory)
//! 2. `../duoadmin.toml` or `../duoadmin.json` (parent directory)
//! 3. Next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use duoadmin_common::SecureString;
use duoadmin_core::Credentials;
use duoadmin_domain::{AdminError, ClientConfig, Result};

use crate::errors::config_io_failure;

const ENV_TIMEOUT_SECS: &str = "DUOADMIN_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "DUOADMIN_USER_AGENT";
const ENV_MAX_ATTEMPTS: &str = "DUOADMIN_MAX_ATTEMPTS";
const ENV_BASE_BACKOFF_MS: &str = "DUOADMIN_BASE_BACKOFF_MS";
const ENV_CREDENTIAL_PATH: &str = "DUOADMIN_CREDENTIAL_PATH";
const ENV_IKEY: &str = "DUOADMIN_IKEY";
const ENV_SKEY: &str = "DUOADMIN_SKEY";
const ENV_HOST: &str = "DUOADMIN_HOST";

const CONFIG_FILE_NAMES: [&str; 2] = ["duoadmin.toml", "duoadmin.json"];

/// Load configuration with automatic fallback strategy
///
/// Environment first, then a probed file, then defaults. A file that exists
/// but cannot be parsed is an error rather than a silent fallback.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        Err(e) => {
            tracing::debug!(error = %e, "No usable environment configuration, trying file");
        }
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(ClientConfig::default())
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables keep their default. At least one variable must be set.
///
/// # Errors
/// Returns `AdminError::Config` if no variable is set or a numeric value
/// does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::default();
    let mut found = false;

    if let Some(timeout) = env_parse::<u64>(ENV_TIMEOUT_SECS)? {
        config.timeout_secs = timeout;
        found = true;
    }
    if let Some(agent) = env_opt(ENV_USER_AGENT) {
        config.user_agent = agent;
        found = true;
    }
    if let Some(attempts) = env_parse::<u32>(ENV_MAX_ATTEMPTS)? {
        config.retry.max_attempts = attempts;
        found = true;
    }
    if let Some(backoff) = env_parse::<u64>(ENV_BASE_BACKOFF_MS)? {
        config.retry.base_backoff_ms = backoff;
        found = true;
    }
    if let Some(path) = env_opt(ENV_CREDENTIAL_PATH) {
        config.credential_path = Some(PathBuf::from(path));
        found = true;
    }

    if !found {
        return Err(AdminError::Config("No DUOADMIN_* configuration variables are set".to_string()));
    }
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `AdminError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AdminError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AdminError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| config_io_failure("Failed to read config file", e))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, choosing the format by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AdminError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AdminError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AdminError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Build credentials from `DUOADMIN_IKEY`, `DUOADMIN_SKEY` and `DUOADMIN_HOST`.
///
/// # Errors
/// `AdminError::Config` when a variable is missing, `AdminError::Validation`
/// when a value is rejected.
pub fn credentials_from_env() -> Result<Credentials> {
    let integration_key = env_var(ENV_IKEY)?;
    let secret_key = SecureString::new(env_var(ENV_SKEY)?);
    let api_host = env_var(ENV_HOST)?;
    Credentials::new(integration_key, secret_key, api_host)
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AdminError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AdminError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const CONFIG_VARS: [&str; 5] =
        [ENV_TIMEOUT_SECS, ENV_USER_AGENT, ENV_MAX_ATTEMPTS, ENV_BASE_BACKOFF_MS, ENV_CREDENTIAL_PATH];

    fn clear_config_env() {
        for key in CONFIG_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(extension: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(extension).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_config_env();

        std::env::set_var(ENV_TIMEOUT_SECS, "12");
        std::env::set_var(ENV_MAX_ATTEMPTS, "5");
        std::env::set_var(ENV_CREDENTIAL_PATH, "/tmp/duoadmin.enc");

        let config = load_from_env().unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_backoff_ms, 200);
        assert_eq!(config.credential_path, Some(PathBuf::from("/tmp/duoadmin.enc")));
        assert_eq!(config.date_header, "X-Duo-Date");

        clear_config_env();
    }

    #[test]
    fn test_load_from_env_nothing_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_config_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AdminError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_config_env();

        std::env::set_var(ENV_BASE_BACKOFF_MS, "soon");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AdminError::Config(ref m) if m.contains(ENV_BASE_BACKOFF_MS)));

        clear_config_env();
    }

    #[test]
    fn test_load_prefers_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_config_env();

        std::env::set_var(ENV_USER_AGENT, "ops-tooling/2.0");
        let config = load().unwrap();
        assert_eq!(config.user_agent, "ops-tooling/2.0");

        clear_config_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(".json", r#"{"timeout_secs": 9, "retry": {"max_attempts": 2}}"#);

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.timeout_secs, 9);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_backoff_ms, 200);
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = temp_config(
            ".toml",
            r#"
timeout_secs = 15
date_header = "Date"
credential_path = "/var/lib/duoadmin/creds.enc"

[retry]
max_attempts = 4
base_backoff_ms = 50
"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.date_header, "Date");
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.credential_path, Some(PathBuf::from("/var/lib/duoadmin/creds.enc")));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/duoadmin.json")));
        assert!(matches!(result, Err(AdminError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let file = temp_config(".json", r#"{ "timeout_secs": "#);
        assert!(load_from_file(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("timeout_secs: 3", Path::new("duoadmin.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_credentials_from_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var(ENV_IKEY, "DIXXXXXXXXXXXXXXXXXX");
        std::env::set_var(ENV_SKEY, "secret");
        std::env::set_var(ENV_HOST, "API-1234.example.com");

        let creds = credentials_from_env().unwrap();
        assert_eq!(creds.integration_key(), "DIXXXXXXXXXXXXXXXXXX");
        assert_eq!(creds.api_host(), "api-1234.example.com");

        std::env::remove_var(ENV_SKEY);
        assert!(matches!(credentials_from_env(), Err(AdminError::Config(ref m)) if m.contains(ENV_SKEY)));

        std::env::set_var(ENV_SKEY, "secret");
        std::env::set_var(ENV_HOST, "https://api-1234.example.com");
        assert!(matches!(credentials_from_env(), Err(AdminError::Validation(_))));

        for key in [ENV_IKEY, ENV_SKEY, ENV_HOST] {
            std::env::remove_var(key);
        }
    }
}
