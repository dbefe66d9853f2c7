//! Dispatcher: resolves the requested name to a command or provider, runs
//! it and hands results to the output collaborator.

use chrono::Utc;
use std::{io, sync::Arc};
use tracing::{error, info};

use crate::{
    cache::ResponseCache,
    command::CommandRegistry,
    config::ConfigStore,
    drilldown::Prompt,
    error::{Error, Result},
    fetch::{HttpFetcher, PageFetcher},
    model::WeatherReport,
    provider::{ProviderFactory, ProviderRegistry},
    settings::{Flags, Settings},
};

/// Shared state for one invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub flags: Flags,
    pub fetcher: Arc<dyn PageFetcher>,
}

impl AppContext {
    pub fn new(settings: Arc<Settings>, flags: Flags, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { settings, flags, fetcher }
    }

    /// Context that talks to the real sites over HTTP.
    pub fn with_http(settings: Settings, flags: Flags) -> Result<Self> {
        let fetcher = HttpFetcher::new(&settings)?;
        Ok(Self::new(Arc::new(settings), flags, Arc::new(fetcher)))
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(&self.settings.config_file)
    }

    pub fn cache(&self) -> ResponseCache {
        ResponseCache::new(&self.settings.cache_dir, self.settings.cache_ttl, self.fetcher.clone())
    }
}

/// Where results end up. Rendering is entirely up to the implementation.
pub trait Output: Send {
    fn weather(&mut self, report: &WeatherReport) -> io::Result<()>;

    /// Free-form message from a command.
    fn line(&mut self, text: &str) -> io::Result<()>;
}

/// Everything a command may need while it runs.
pub struct Session<'a> {
    pub ctx: &'a AppContext,
    pub providers: &'a ProviderRegistry,
    pub output: &'a mut dyn Output,
    pub prompt: &'a mut dyn Prompt,
}

impl Session<'_> {
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.output.line(text).map_err(Error::Output)
    }
}

/// Name and arguments as resolved by the argument parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub name: Option<String>,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(name: Option<String>, args: Vec<String>) -> Self {
        Self { name, args }
    }
}

/// What happened when every provider was run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct App {
    ctx: AppContext,
    providers: ProviderRegistry,
    commands: CommandRegistry,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        Self::with_registries(
            ctx,
            ProviderRegistry::with_builtin_providers(),
            CommandRegistry::with_builtin_commands(),
        )
    }

    pub fn with_registries(ctx: AppContext, providers: ProviderRegistry, commands: CommandRegistry) -> Self {
        Self { ctx, providers, commands }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Commands win over providers with the same name. No name runs every
    /// provider, continuing past failures.
    pub async fn run(
        &self,
        invocation: &Invocation,
        output: &mut dyn Output,
        prompt: &mut dyn Prompt,
    ) -> Result<RunSummary> {
        let Some(name) = invocation.name.as_deref() else {
            return self.run_all(output).await;
        };

        if let Some(factory) = self.commands.get(name) {
            info!(command = name, "Running command");
            let command = factory();
            let mut session = Session { ctx: &self.ctx, providers: &self.providers, output, prompt };
            command.run(&mut session, &invocation.args).await?;
            return Ok(RunSummary { succeeded: 1, failed: 0 });
        }

        if let Some(factory) = self.providers.get(name) {
            self.run_provider(factory, output).await?;
            return Ok(RunSummary { succeeded: 1, failed: 0 });
        }

        Err(Error::UnknownCommand {
            name: name.to_string(),
            available: self.commands.names().chain(self.providers.names()).map(String::from).collect(),
        })
    }

    /// Run providers one after another; a failing provider is reported and
    /// the rest still run.
    pub async fn run_all(&self, output: &mut dyn Output) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (name, factory) in self.providers.iter() {
            match self.run_provider(factory, output).await {
                Ok(()) => summary.succeeded += 1,
                Err(err @ Error::Output(_)) => return Err(err),
                Err(err) => {
                    summary.failed += 1;
                    self.report_failure(name, &err);
                }
            }
        }

        Ok(summary)
    }

    async fn run_provider(&self, factory: &ProviderFactory, output: &mut dyn Output) -> Result<()> {
        let provider = factory.build(&self.ctx);
        info!(provider = provider.name(), location = %provider.location().name, "Running provider");

        let info = provider.fetch_and_parse().await?;
        let report = WeatherReport {
            provider: provider.name().to_string(),
            title: provider.title().to_string(),
            location: provider.location().clone(),
            info,
            fetched_at: Utc::now(),
        };

        output.weather(&report).map_err(Error::Output)
    }

    fn report_failure(&self, provider: &str, err: &Error) {
        if self.ctx.flags.debug {
            error!(provider, error = ?err, "Error during provider run");
        } else {
            error!(provider, error = %err, "Error during provider run");
        }
    }
}
