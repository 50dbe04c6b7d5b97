//! Configuration loader
//!
//! Loads [`ParasutConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PARASUT_CLIENT_ID`: OAuth client id
//! - `PARASUT_CLIENT_SECRET`: OAuth client secret
//! - `PARASUT_REDIRECT_URI`: OAuth redirect URI
//! - `PARASUT_EMAIL`: Login e-mail (sent as `username`)
//! - `PARASUT_PASSWORD`: Login password
//! - `PARASUT_FIRM_ID`: Company id used in every resource path
//! - `PARASUT_BASE_URL`: Optional, defaults to `https://api.parasut.com`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./parasut.json` or `./parasut.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location
//!
//! Loading does not validate; pass the result to
//! [`Credentials::from_config`](parasut_domain::Credentials::from_config).

use std::path::{Path, PathBuf};

use parasut_domain::{ParasutConfig, ParasutError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["parasut.json", "parasut.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ParasutError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<ParasutConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Every variable except `PARASUT_BASE_URL` must be present.
///
/// # Errors
/// Returns `ParasutError::Config` if a required variable is missing.
pub fn load_from_env() -> Result<ParasutConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary key lookup.
///
/// # Errors
/// Returns `ParasutError::Config` naming the first missing key.
pub fn load_from_lookup<F>(lookup: F) -> Result<ParasutConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).ok_or_else(|| {
            ParasutError::Config(format!("Missing required environment variable: {key}"))
        })
    };

    Ok(ParasutConfig {
        client_id: required("PARASUT_CLIENT_ID")?,
        client_secret: required("PARASUT_CLIENT_SECRET")?,
        redirect_uri: required("PARASUT_REDIRECT_URI")?,
        email: required("PARASUT_EMAIL")?,
        password: required("PARASUT_PASSWORD")?,
        firm_id: required("PARASUT_FIRM_ID")?,
        base_url: lookup("PARASUT_BASE_URL").filter(|url| !url.trim().is_empty()),
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ParasutError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ParasutConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ParasutError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ParasutError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ParasutError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ParasutConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ParasutError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ParasutError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ParasutError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_under(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_under(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_under(dir: &Path) -> Vec<PathBuf> {
    [dir.to_path_buf(), dir.join(".."), dir.join("../..")]
        .iter()
        .flat_map(|base| CONFIG_FILE_NAMES.iter().map(move |name| base.join(name)))
        .collect()
}
