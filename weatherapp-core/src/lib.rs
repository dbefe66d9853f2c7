//! Core library for the `weatherapp` aggregator.
//!
//! This crate defines:
//! - The provider contract and the built-in scraping providers
//! - Name-keyed registries of providers and commands
//! - The disk cache of downloaded pages and the per-user location config
//! - The interactive location drill-down
//! - The dispatcher that ties them together
//!
//! It is used by `weatherapp-cli`, which supplies argument parsing, the
//! terminal prompt and output rendering.

pub mod app;
pub mod cache;
pub mod command;
pub mod config;
pub mod drilldown;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod registry;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use app::{App, AppContext, Invocation, Output, RunSummary, Session};
pub use cache::ResponseCache;
pub use command::{Command, CommandFactory, CommandRegistry};
pub use config::ConfigStore;
pub use drilldown::{DrillLevel, Prompt, SelectionError};
pub use error::{Error, NetworkError, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use model::{Location, WeatherInfo, WeatherReport};
pub use provider::{ProviderFactory, ProviderRegistry, ScrapingProvider, Site, WeatherProvider};
pub use registry::Registry;
pub use settings::{Flags, Settings};
