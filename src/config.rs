// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_SECRET` | Secret used to verify launch payload signatures | empty |
//! | `GROUP_CALLBACK_SECRET` | Shared secret of the platform webhook | empty |
//! | `GROUP_CALLBACK_CONFIRM` | Confirmation string for the webhook handshake | empty |
//! | `DATA_DIR` | Directory holding the account database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `SIGNATURE_CACHE_CAPACITY` | Max identities kept in the signature cache | `10000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

/// Environment variable name for the launch payload HMAC secret.
///
/// An unset secret is treated as the empty string. Verification still runs,
/// so every non-trivial signature is rejected.
pub const APP_SECRET_ENV: &str = "APP_SECRET";

/// Environment variable name for the webhook shared secret.
pub const CALLBACK_SECRET_ENV: &str = "GROUP_CALLBACK_SECRET";

/// Environment variable name for the webhook confirmation string.
pub const CALLBACK_CONFIRM_ENV: &str = "GROUP_CALLBACK_CONFIRM";

/// Environment variable name for the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SIGNATURE_CACHE_CAPACITY_ENV: &str = "SIGNATURE_CACHE_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SIGNATURE_CACHE_CAPACITY: usize = 10_000;

/// File name of the account database inside `DATA_DIR`.
pub const ACCOUNTS_DB_FILE: &str = "accounts.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Process-wide configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub app_secret: String,
    pub callback_secret: String,
    pub callback_confirm: String,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub signature_cache_capacity: usize,
    pub log_format: LogFormat,
}

// Secrets stay out of debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_secret", &"<redacted>")
            .field("callback_secret", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("signature_cache_capacity", &self.signature_cache_capacity)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_secret: String::new(),
            callback_secret: String::new(),
            callback_confirm: String::new(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            signature_cache_capacity: DEFAULT_SIGNATURE_CACHE_CAPACITY,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                expected: "port number",
                value: raw,
            })?,
            None => defaults.port,
        };

        let signature_cache_capacity = match lookup(SIGNATURE_CACHE_CAPACITY_ENV) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: SIGNATURE_CACHE_CAPACITY_ENV,
                        expected: "positive integer",
                        value: raw,
                    })
                }
            },
            None => defaults.signature_cache_capacity,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::to_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            app_secret: lookup(APP_SECRET_ENV).unwrap_or_default(),
            callback_secret: lookup(CALLBACK_SECRET_ENV).unwrap_or_default(),
            callback_confirm: lookup(CALLBACK_CONFIRM_ENV).unwrap_or_default(),
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port,
            signature_cache_capacity,
            log_format,
        })
    }

    /// Path of the account database file.
    pub fn accounts_db_path(&self) -> PathBuf {
        self.data_dir.join(ACCOUNTS_DB_FILE)
    }
}
