//! Interactive narrowing of a site's location catalogue, e.g.
//! continent → country → region → city, one listing page per level.

use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::{
    cache::ResponseCache,
    error::{Error, Result},
    model::Location,
    provider::Site,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrillLevel {
    Continent,
    Country,
    Region,
    City,
}

impl DrillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrillLevel::Continent => "continent",
            DrillLevel::Country => "country",
            DrillLevel::Region => "region",
            DrillLevel::City => "city",
        }
    }
}

impl fmt::Display for DrillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a line typed at the prompt was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a valid number. Try again...")]
    NotANumber(String),

    #[error("This number is out of range, choose 1..={max}. Try again...")]
    OutOfRange { max: usize },
}

/// Turn a 1-based selection typed by the user into a 0-based index.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let input = input.trim();
    let number: i64 = input.parse().map_err(|_| SelectionError::NotANumber(input.to_string()))?;

    match usize::try_from(number) {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(SelectionError::OutOfRange { max: count }),
    }
}

/// Terminal side of the drill-down.
pub trait Prompt: Send {
    /// Present the numbered candidates of one level.
    fn show(&mut self, level: DrillLevel, choices: &[Location]);

    /// Read one raw line. Fails only when the input channel is gone.
    fn read_line(&mut self, message: &str) -> Result<String>;

    /// Tell the user their input was rejected; the same level is asked again.
    fn reject(&mut self, reason: &SelectionError);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState {
    Selecting { depth: usize, url: String, last: Option<Location> },
    Done(Location),
}

/// Drives one site's drill-down over the response cache.
#[derive(Debug)]
pub struct DrillDown<'a> {
    site: &'a dyn Site,
    cache: &'a ResponseCache,
    refresh: bool,
}

impl<'a> DrillDown<'a> {
    pub fn new(site: &'a dyn Site, cache: &'a ResponseCache, refresh: bool) -> Self {
        Self { site, cache, refresh }
    }

    pub fn initial_state(&self) -> DrillState {
        DrillState::Selecting { depth: 0, url: self.site.browse_url().to_string(), last: None }
    }

    /// Walk every level until a final location is chosen.
    pub async fn run(&self, prompt: &mut dyn Prompt) -> Result<Location> {
        let mut state = self.initial_state();
        loop {
            match state {
                DrillState::Done(location) => return Ok(location),
                selecting => state = self.step(selecting, prompt).await?,
            }
        }
    }

    /// Advance by one level. Invalid input never leaves the current level.
    pub async fn step(&self, state: DrillState, prompt: &mut dyn Prompt) -> Result<DrillState> {
        let (depth, url, last) = match state {
            DrillState::Selecting { depth, url, last } => (depth, url, last),
            done @ DrillState::Done(_) => return Ok(done),
        };

        let levels = self.site.levels();
        let Some(&level) = levels.get(depth) else {
            return self.finish(last, &url);
        };

        let choices = self.candidates(level, &url).await?;
        if choices.is_empty() {
            debug!(provider = self.site.name(), %level, %url, "Empty listing, stopping drill-down");
            return self.finish(last, &url);
        }

        prompt.show(level, &choices);
        let index = choose(level, choices.len(), prompt)?;
        let Some(chosen) = choices.into_iter().nth(index) else {
            return self.finish(last, &url);
        };

        if depth + 1 >= levels.len() {
            Ok(DrillState::Done(chosen))
        } else {
            Ok(DrillState::Selecting { depth: depth + 1, url: chosen.url.clone(), last: Some(chosen) })
        }
    }

    async fn candidates(&self, level: DrillLevel, url: &str) -> Result<Vec<Location>> {
        let page = self.cache.fetch(url, self.refresh).await?;
        let page = String::from_utf8_lossy(&page);

        Ok(self
            .site
            .parse_locations(level, &page)
            .into_iter()
            .filter_map(|(label, href)| Some(Location::new(label, self.site.resolve_url(&href)?)))
            .collect())
    }

    fn finish(&self, last: Option<Location>, url: &str) -> Result<DrillState> {
        last.map(DrillState::Done).ok_or_else(|| Error::NoLocations {
            provider: self.site.name().to_string(),
            url: url.to_string(),
        })
    }
}

fn choose(level: DrillLevel, count: usize, prompt: &mut dyn Prompt) -> Result<usize> {
    let message = format!("Please select {level} (1-{count}): ");
    loop {
        let line = prompt.read_line(&message)?;
        match parse_selection(&line, count) {
            Ok(index) => return Ok(index),
            Err(reason) => prompt.reject(&reason),
        }
    }
}
