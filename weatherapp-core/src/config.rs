use std::{
    fs, io,
    path::{Path, PathBuf},
};

use toml::{Table, Value};
use tracing::warn;

use crate::{
    error::{Error, Result},
    model::Location,
};

/// Per-user file mapping a provider name to its chosen [`Location`].
///
/// Example TOML:
/// ```toml
/// [accu]
/// name = "Brody"
/// url = "https://www.accuweather.com/uk/ua/brody/324506/weather-forecast/324506"
/// ```
///
/// Tables that are not provider locations are left alone.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document, or an empty one if it doesn't exist yet.
    pub fn load(&self) -> Result<Table> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Table::new()),
            Err(err) => return Err(Error::io(&self.path, err)),
        };

        contents.parse::<Table>().map_err(|err| Error::Config {
            path: self.path.clone(),
            message: err.message().to_string(),
        })
    }

    /// Saved location for `provider`, if there is a well-formed entry.
    pub fn location(&self, provider: &str) -> Result<Option<Location>> {
        let table = self.load()?;

        Ok(table.get(provider).and_then(|value| value.clone().try_into::<Location>().ok()))
    }

    /// Saved location for `provider`, falling back to `default` when absent.
    pub fn resolve(&self, provider: &str, default: Location) -> Result<Location> {
        Ok(self.location(provider)?.unwrap_or(default))
    }

    /// Replace the entry for `provider`, creating the file and its parent
    /// directories as needed. A corrupt file is replaced by a fresh one.
    pub fn save(&self, provider: &str, location: &Location) -> Result<()> {
        let mut table = match self.load() {
            Ok(table) => table,
            Err(err @ Error::Config { .. }) => {
                warn!(provider, error = %err, "Discarding unreadable configuration file");
                Table::new()
            }
            Err(err) => return Err(err),
        };

        let entry = Value::try_from(location).map_err(|err| Error::Config {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        table.insert(provider.to_string(), entry);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }

        let contents = toml::to_string_pretty(&table).map_err(|err| Error::Config {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        fs::write(&self.path, contents).map_err(|err| Error::io(&self.path, err))
    }
}
