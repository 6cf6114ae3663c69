// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! SDK configuration
//!
//! A configuration can be built in code, read from a JSON config file, or
//! taken from `DAT_*` environment variables. [`SdkConfig::load`] combines
//! the last two: the first config file found is read and the environment
//! overrides it.
//!
//! Config file format:
//!
//! ```json
//! {
//!     "mgmt_ip": "172.19.1.41",
//!     "username": "admin",
//!     "password": "password",
//!     "tenant": "/root",
//!     "api_version": "2.2"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default number of pooled connections
pub const MAX_POOL_CONN: usize = 5;

/// Default API version
pub const DEFAULT_API_VERSION: &str = "2.2";

/// Default tenant
pub const DEFAULT_TENANT: &str = "/root";

/// Default per-request timeout (seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTPS management port
pub const SECURE_PORT: u16 = 7718;

/// Plain HTTP management port
pub const INSECURE_PORT: u16 = 7717;

/// Config file names searched by [`SdkConfig::load`]
const CONFIG_FILE_NAMES: [&str; 2] = [".datera-config.json", "datera-config.json"];

/// Connection parameters shared by every pooled connection
#[derive(Debug)]
pub struct SdkConfig {
    /// Management IP or hostname
    pub hostname: String,
    /// Port override; defaults to 7718 when secure, 7717 otherwise
    pub port: Option<u16>,
    pub username: String,
    pub password: SecretString,
    pub tenant: String,
    /// API version without the leading `v`, e.g. `2.2`
    pub api_version: String,
    /// Use HTTPS
    pub secure: bool,
    /// Verify the server certificate (HTTPS only)
    pub verify_tls: bool,
    /// Per-request transport timeout
    pub timeout: Duration,
    /// Number of authenticated connections kept in the pool
    pub pool_size: usize,
    /// Extra headers sent on every request
    pub headers: BTreeMap<String, String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: None,
            username: String::new(),
            password: SecretString::from(String::new()),
            tenant: DEFAULT_TENANT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            secure: true,
            verify_tls: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pool_size: MAX_POOL_CONN,
            headers: BTreeMap::new(),
        }
    }
}

/// On-disk config file layout
#[derive(Debug, Deserialize)]
struct ConfigFile {
    mgmt_ip: String,
    username: String,
    password: String,
    #[serde(default)]
    tenant: Option<String>,
    #[serde(default)]
    api_version: Option<String>,
}

impl SdkConfig {
    /// Create a configuration with the required fields and defaults for
    /// everything else.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            ..Default::default()
        }
    }

    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let mut config = Self::new(file.mgmt_ip, file.username, file.password);
        if let Some(tenant) = file.tenant {
            config.tenant = tenant;
        }
        if let Some(api_version) = file.api_version {
            config.api_version = api_version.trim_start_matches('v').to_string();
        }
        Ok(config)
    }

    /// Build a configuration purely from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Locate a config file, then apply environment overrides.
    ///
    /// Search order:
    /// 1. `DAT_CONFIG` environment variable
    /// 2. `./datera-config.json`
    /// 3. `~/.datera-config.json`, `~/datera-config.json`
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading Datera config file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `DAT_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("DAT_MGMT") {
            self.hostname = host;
        }
        if let Ok(user) = std::env::var("DAT_USER") {
            self.username = user;
        }
        if let Ok(pass) = std::env::var("DAT_PASS") {
            self.password = SecretString::from(pass);
        }
        if let Ok(tenant) = std::env::var("DAT_TENANT") {
            self.tenant = tenant;
        }
        if let Ok(api) = std::env::var("DAT_API") {
            self.api_version = api.trim_start_matches('v').to_string();
        }
        if let Ok(secure) = std::env::var("DAT_SECURE") {
            self.secure = parse_bool(&secure);
        }
        if let Ok(insecure) = std::env::var("DAT_TLS_INSECURE") {
            self.verify_tls = !parse_bool(&insecure);
        }
        if let Ok(timeout) = std::env::var("DAT_TIMEOUT") {
            self.timeout = parse_timeout(&timeout)?;
        }
        if let Ok(size) = std::env::var("DAT_POOL_SIZE") {
            self.pool_size = size
                .parse()
                .map_err(|_| Error::Config(format!("Invalid DAT_POOL_SIZE: {}", size)))?;
        }
        Ok(())
    }

    /// Check that the fields needed to log in are present.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(Error::Config("management hostname is not set".to_string()));
        }
        if self.username.is_empty() {
            return Err(Error::Config("username is not set".to_string()));
        }
        if self.password.expose_secret().is_empty() {
            return Err(Error::Config("password is not set".to_string()));
        }
        if self.pool_size == 0 {
            return Err(Error::Config("pool size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Port requests are sent to
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.secure { SECURE_PORT } else { INSECURE_PORT })
    }
}

fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DAT_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("datera-config.json");
    if local.is_file() {
        return Some(local);
    }

    let home = dirs::home_dir()?;
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| home.join(name))
        .find(|path| path.is_file())
}

fn parse_bool(s: &str) -> bool {
    s == "1" || s.eq_ignore_ascii_case("true")
}

/// Parse `30s`, `500ms`, `2m` or a bare number of seconds.
pub fn parse_timeout(s: &str) -> Result<Duration> {
    let s = s.trim();
    let invalid = || Error::Config(format!("Invalid timeout: {}", s));

    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        _ => Err(invalid()),
    }
}
