// src/config.rs

//! Configuration loading utilities.
//!
//! Reads the TOML configuration, applies `RANKWATCH_*` environment overrides
//! and validates the result.

use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable overriding `source.url`.
pub const ENV_URL: &str = "RANKWATCH_URL";
/// Environment variable overriding `monitor.interval_secs`.
pub const ENV_INTERVAL_SECS: &str = "RANKWATCH_INTERVAL_SECS";
/// Environment variable overriding `http.timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "RANKWATCH_TIMEOUT_SECS";
/// Environment variable overriding `source.default_seats`.
pub const ENV_DEFAULT_SEATS: &str = "RANKWATCH_DEFAULT_SEATS";

/// Load configuration from a TOML file, apply environment overrides and
/// validate it.
///
/// A missing or unreadable file falls back to defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(path);
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Read a configuration file and apply environment overrides without
/// validating the result.
///
/// Unlike [`load_config`] a missing or unparsable file is an error.
pub fn read_config(path: &Path) -> Result<Config> {
    let mut config = Config::load(path)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply overrides looked up by variable name.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_URL) {
        log::debug!("{} overrides source.url", ENV_URL);
        config.source.url = url;
    }
    if let Some(secs) = parse_var(&lookup, ENV_INTERVAL_SECS)? {
        config.monitor.interval_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, ENV_TIMEOUT_SECS)? {
        config.http.timeout_secs = secs;
    }
    if let Some(seats) = parse_var(&lookup, ENV_DEFAULT_SEATS)? {
        config.source.default_seats = seats;
    }
    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::config(format!("{key}={raw:?}: {e}"))),
        None => Ok(None),
    }
}
