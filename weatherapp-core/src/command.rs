use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    app::Session,
    error::{Error, Result},
    registry::Registry,
};

/// A named action other than "show the weather of one provider".
#[async_trait]
pub trait Command: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn run(&self, session: &mut Session<'_>, args: &[String]) -> Result<()>;
}

pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

pub type CommandRegistry = Registry<CommandFactory>;

fn factory<C: Command + Default + 'static>() -> CommandFactory {
    Arc::new(|| Box::new(C::default()) as Box<dyn Command>)
}

impl Registry<CommandFactory> {
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        registry.add(Configurate::NAME, factory::<Configurate>());
        registry.add(Providers::NAME, factory::<Providers>());
        registry.add(ClearCache::NAME, factory::<ClearCache>());
        registry
    }
}

/// `configurate <provider>`: pick a location interactively and save it.
#[derive(Debug, Default)]
pub struct Configurate;

impl Configurate {
    pub const NAME: &'static str = "configurate";
}

#[async_trait]
impl Command for Configurate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn run(&self, session: &mut Session<'_>, args: &[String]) -> Result<()> {
        let providers = session.providers;
        let available = || providers.names().map(String::from).collect::<Vec<_>>();

        let Some(name) = args.first() else {
            return Err(Error::Usage(format!(
                "Usage: configurate <provider>. Known providers: {}",
                available().join(", ")
            )));
        };

        let factory = providers
            .get(name)
            .ok_or_else(|| Error::UnknownProvider { name: name.clone(), available: available() })?;

        let mut provider = factory.build(session.ctx);
        let location = provider.configurate(&mut *session.prompt).await?;

        session.line(&format!("{}: location set to {} ({})", provider.title(), location.name, location.url))
    }
}

/// `providers`: list registered providers in registration order.
#[derive(Debug, Default)]
pub struct Providers;

impl Providers {
    pub const NAME: &'static str = "providers";
}

#[async_trait]
impl Command for Providers {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn run(&self, session: &mut Session<'_>, _args: &[String]) -> Result<()> {
        let providers = session.providers;
        for (name, factory) in providers.iter() {
            session.line(&format!("{name:<10} {}", factory.title()))?;
        }
        Ok(())
    }
}

/// `clear_cache`: delete every cached page and the cache directory.
#[derive(Debug, Default)]
pub struct ClearCache;

impl ClearCache {
    pub const NAME: &'static str = "clear_cache";
}

#[async_trait]
impl Command for ClearCache {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn run(&self, session: &mut Session<'_>, _args: &[String]) -> Result<()> {
        let removed = session.ctx.cache().clear()?;
        session.line(&format!("Deletion complete, {removed} cached pages removed"))
    }
}
