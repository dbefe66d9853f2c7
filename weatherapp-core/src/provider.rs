use async_trait::async_trait;
use reqwest::Url;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, warn};

use crate::{
    app::AppContext,
    cache::ResponseCache,
    config::ConfigStore,
    drilldown::{DrillDown, DrillLevel, Prompt},
    error::Result,
    model::{Location, WeatherInfo},
    registry::Registry,
};

pub mod accu;
pub(crate) mod html;
pub mod rp5;
pub mod sinoptik;

pub use accu::AccuWeather;
pub use rp5::Rp5;
pub use sinoptik::Sinoptik;

/// Everything the rest of the application can ask of a weather source.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Stable registry key, e.g. `"accu"`.
    fn name(&self) -> &'static str;

    /// Human readable label for output.
    fn title(&self) -> &'static str;

    fn default_location(&self) -> Location;

    /// Location this instance will scrape, resolved at construction.
    fn location(&self) -> &Location;

    /// Saved location from the config file, or the default. Never fails:
    /// an unreadable file is reported as a warning.
    fn resolve_configuration(&self) -> Location;

    /// Download (or reuse from cache) the location page and scrape it.
    async fn fetch_and_parse(&self) -> Result<WeatherInfo>;

    /// Run the interactive drill-down and persist the chosen location.
    async fn configurate(&mut self, prompt: &mut dyn Prompt) -> Result<Location>;
}

/// Site specific constants and HTML parsing hooks.
///
/// Parsers must be tolerant: markup that doesn't match yields empty lists
/// or `None` fields, never an error.
pub trait Site: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn default_location(&self) -> Location;

    /// Prefix used to resolve relative links found on the site's pages.
    fn base_url(&self) -> &'static str;

    /// First listing page of the drill-down.
    fn browse_url(&self) -> &'static str;

    fn levels(&self) -> &'static [DrillLevel];

    /// Ordered `(label, href)` candidates on a listing page.
    fn parse_locations(&self, level: DrillLevel, page: &str) -> Vec<(String, String)>;

    /// Link to a second page that holds the actual conditions, if the
    /// location page is only an overview.
    fn detail_link(&self, _page: &str) -> Option<String> {
        None
    }

    fn parse_weather(&self, page: &str) -> WeatherInfo;

    /// Absolute URL for an href found on one of this site's pages.
    fn resolve_url(&self, href: &str) -> Option<String> {
        let base = Url::parse(self.base_url()).ok()?;
        base.join(href.trim()).ok().map(String::from)
    }
}

/// One [`WeatherProvider`] for every [`Site`]: owns the config store and
/// the response cache, delegates parsing to the site.
#[derive(Debug)]
pub struct ScrapingProvider<S> {
    site: S,
    location: Location,
    config: ConfigStore,
    cache: ResponseCache,
    refresh: bool,
    debug: bool,
}

impl<S: Site> ScrapingProvider<S> {
    pub fn new(site: S, ctx: &AppContext) -> Self {
        let location = site.default_location();
        let mut provider = Self {
            site,
            location,
            config: ctx.config_store(),
            cache: ctx.cache(),
            refresh: ctx.flags.refresh,
            debug: ctx.flags.debug,
        };
        provider.location = provider.resolve_configuration();
        provider
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    async fn page(&self, url: &str) -> Result<String> {
        let bytes = self.cache.fetch(url, self.refresh).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl<S: Site> WeatherProvider for ScrapingProvider<S> {
    fn name(&self) -> &'static str {
        self.site.name()
    }

    fn title(&self) -> &'static str {
        self.site.title()
    }

    fn default_location(&self) -> Location {
        self.site.default_location()
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn resolve_configuration(&self) -> Location {
        let provider = self.site.name();
        match self.config.resolve(provider, self.site.default_location()) {
            Ok(location) => location,
            Err(err) => {
                if self.debug {
                    warn!(provider, error = ?err, "Bad configuration file. Please reconfigurate your provider");
                } else {
                    warn!(provider, "Bad configuration file. Please reconfigurate your provider");
                }
                self.site.default_location()
            }
        }
    }

    async fn fetch_and_parse(&self) -> Result<WeatherInfo> {
        let mut page = self.page(&self.location.url).await?;

        if let Some(url) = self.site.detail_link(&page).and_then(|href| self.site.resolve_url(&href)) {
            debug!(provider = self.site.name(), %url, "Following detail page");
            page = self.page(&url).await?;
        }

        Ok(self.site.parse_weather(&page))
    }

    async fn configurate(&mut self, prompt: &mut dyn Prompt) -> Result<Location> {
        let location = DrillDown::new(&self.site, &self.cache, self.refresh).run(prompt).await?;

        self.config.save(self.site.name(), &location)?;
        self.location = location.clone();

        Ok(location)
    }
}

/// Builds a provider for one invocation. The title is kept next to the
/// constructor so listings don't have to build providers.
#[derive(Clone)]
pub struct ProviderFactory {
    title: &'static str,
    build: Arc<dyn Fn(&AppContext) -> Box<dyn WeatherProvider> + Send + Sync>,
}

impl ProviderFactory {
    pub fn new<F>(title: &'static str, build: F) -> Self
    where
        F: Fn(&AppContext) -> Box<dyn WeatherProvider> + Send + Sync + 'static,
    {
        Self { title, build: Arc::new(build) }
    }

    /// Factory for a site with no state of its own.
    pub fn for_site<S: Site + Default + 'static>() -> Self {
        Self::new(S::default().title(), |ctx: &AppContext| {
            Box::new(ScrapingProvider::new(S::default(), ctx)) as Box<dyn WeatherProvider>
        })
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn build(&self, ctx: &AppContext) -> Box<dyn WeatherProvider> {
        (self.build)(ctx)
    }
}

impl Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactory").field("title", &self.title).finish_non_exhaustive()
    }
}

pub type ProviderRegistry = Registry<ProviderFactory>;

impl Registry<ProviderFactory> {
    /// The built-in sources, in listing order.
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        registry.add(accu::NAME, ProviderFactory::for_site::<AccuWeather>());
        registry.add(rp5::NAME, ProviderFactory::for_site::<Rp5>());
        registry.add(sinoptik::NAME, ProviderFactory::for_site::<Sinoptik>());
        registry
    }
}
