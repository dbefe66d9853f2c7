use directories::BaseDirs;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{Error, Result};

/// File name of the per-user location config, relative to the home directory.
pub const CONFIG_FILE: &str = "weatherapp.toml";

/// Directory holding cached pages, relative to the home directory.
pub const CACHE_DIR: &str = "weather_cache";

/// Debug log written on every run, relative to the home directory.
pub const LOG_FILE: &str = "weatherapp.log";

/// How long a cached page stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

/// Process-wide settings, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_file: PathBuf,
    pub cache_dir: PathBuf,
    pub log_file: PathBuf,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Settings {
    /// Settings rooted at the current user's home directory.
    pub fn from_home() -> Result<Self> {
        let dirs = BaseDirs::new().ok_or_else(|| {
            Error::Usage("Could not determine the home directory of the current user".to_string())
        })?;

        Ok(Self::with_root(dirs.home_dir()))
    }

    /// Same layout as [`Settings::from_home`], placed under `root`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_file: root.join(CONFIG_FILE),
            cache_dir: root.join(CACHE_DIR),
            log_file: root.join(LOG_FILE),
            cache_ttl: CACHE_TTL,
            request_timeout: REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Booleans resolved by the argument parser and passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Bypass the response cache for every fetch in this invocation.
    pub refresh: bool,
    /// Report errors with their full chain instead of a one-line message.
    pub debug: bool,
}
