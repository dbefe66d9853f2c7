use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong inside the core crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The config file exists but is not valid TOML.
    #[error("Bad configuration file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    /// The first listing page of a drill-down had nothing to choose from.
    #[error("No locations found for provider '{provider}' at {url}")]
    NoLocations { provider: String, url: String },

    /// The interactive input channel was closed or interrupted.
    #[error("Input aborted: {0}")]
    Prompt(String),

    #[error("Unknown provider '{name}'. Supported providers: {}.", available.join(", "))]
    UnknownProvider { name: String, available: Vec<String> },

    #[error("No such command '{name}'. Available: {}.", available.join(", "))]
    UnknownCommand { name: String, available: Vec<String> },

    #[error("{0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Failures while talking to a weather site. None of these are retried.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection error while requesting {url}. Make sure you are connected to the Internet: {message}")]
    Connection { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl NetworkError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_connect() {
            Self::Connection { url, message: err.to_string() }
        } else if let Some(status) = err.status() {
            Self::Status { url, status: status.as_u16() }
        } else {
            Self::Request { url, message: err.to_string() }
        }
    }
}
