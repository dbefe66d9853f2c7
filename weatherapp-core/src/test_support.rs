//! Scripted doubles for the network, the terminal and the output.

use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::{Arc, Mutex},
};
use tempfile::TempDir;

use crate::{
    app::{AppContext, Output},
    drilldown::{DrillLevel, Prompt, SelectionError},
    error::{Error, NetworkError, Result},
    fetch::PageFetcher,
    model::{Location, WeatherInfo, WeatherReport},
    provider::Site,
    settings::{Flags, Settings},
};

/// Serves canned pages and counts requests per URL. Unknown URLs fail with
/// a connection error. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedFetcher {
    pages: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl ScriptedFetcher {
    pub fn with_page(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), body.into());
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        self.pages.lock().unwrap().get(url).cloned().ok_or_else(|| NetworkError::Connection {
            url: url.to_string(),
            message: "no scripted page".to_string(),
        })
    }
}

/// Feeds prepared lines and records what the drill-down showed.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    inputs: VecDeque<String>,
    pub shown: Vec<(DrillLevel, Vec<Location>)>,
    pub rejected: Vec<SelectionError>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { inputs: inputs.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

impl Prompt for ScriptedPrompt {
    fn show(&mut self, level: DrillLevel, choices: &[Location]) {
        self.shown.push((level, choices.to_vec()));
    }

    fn read_line(&mut self, _message: &str) -> Result<String> {
        self.inputs.pop_front().ok_or_else(|| Error::Prompt("input closed".to_string()))
    }

    fn reject(&mut self, reason: &SelectionError) {
        self.rejected.push(reason.clone());
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingOutput {
    pub reports: Vec<WeatherReport>,
    pub lines: Vec<String>,
}

impl Output for RecordingOutput {
    fn weather(&mut self, report: &WeatherReport) -> io::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }
}

/// Site whose pages are plain text: listings are `label|href` lines and
/// weather pages are `key=value` lines (`temp`, `feels`, `cond`, `wind`,
/// `detail`).
#[derive(Debug, Clone)]
pub(crate) struct FakeSite {
    browse: &'static str,
    home: &'static str,
    levels: &'static [DrillLevel],
}

impl FakeSite {
    pub fn four_levels(browse: &'static str) -> Self {
        Self::with_levels(
            browse,
            &[DrillLevel::Continent, DrillLevel::Country, DrillLevel::Region, DrillLevel::City],
        )
    }

    pub fn with_levels(browse: &'static str, levels: &'static [DrillLevel]) -> Self {
        Self { browse, home: "https://fake.test/home", levels }
    }

    pub fn home(self, home: &'static str) -> Self {
        Self { home, ..self }
    }

    fn value<'a>(page: &'a str, key: &str) -> Option<&'a str> {
        page.lines().find_map(|line| line.trim().strip_prefix(key)?.strip_prefix('='))
    }
}

impl Site for FakeSite {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn title(&self) -> &'static str {
        "Fake Weather"
    }

    fn default_location(&self) -> Location {
        Location::new("Home", self.home)
    }

    fn base_url(&self) -> &'static str {
        "https://fake.test/"
    }

    fn browse_url(&self) -> &'static str {
        self.browse
    }

    fn levels(&self) -> &'static [DrillLevel] {
        self.levels
    }

    fn parse_locations(&self, _level: DrillLevel, page: &str) -> Vec<(String, String)> {
        page.lines()
            .filter_map(|line| line.split_once('|'))
            .map(|(label, href)| (label.trim().to_string(), href.trim().to_string()))
            .collect()
    }

    fn detail_link(&self, page: &str) -> Option<String> {
        Self::value(page, "detail").map(String::from)
    }

    fn parse_weather(&self, page: &str) -> WeatherInfo {
        WeatherInfo {
            temperature: Self::value(page, "temp").map(String::from),
            feels_like: Self::value(page, "feels").map(String::from),
            condition: Self::value(page, "cond").map(String::from),
            wind: Self::value(page, "wind").map(String::from),
        }
    }
}

/// Listing page understood by [`FakeSite`].
pub(crate) fn listing(entries: &[(&str, &str)]) -> String {
    entries.iter().map(|(label, href)| format!("{label}|{href}\n")).collect()
}

/// Context rooted in a fresh temporary home directory.
pub(crate) fn context(fetcher: ScriptedFetcher) -> (TempDir, AppContext) {
    let dir = TempDir::new().unwrap();
    let settings = Settings::with_root(dir.path());
    let ctx = AppContext::new(Arc::new(settings), Flags::default(), Arc::new(fetcher));
    (dir, ctx)
}

/// Collects formatted `tracing` output. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route events on this thread into the buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
