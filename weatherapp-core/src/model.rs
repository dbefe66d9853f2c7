use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named place together with the page that describes its weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub url: String,
}

impl Location {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// Current conditions scraped from one page. Any field may be missing
/// when the site markup doesn't contain it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherInfo {
    pub temperature: Option<String>,
    pub feels_like: Option<String>,
    pub condition: Option<String>,
    pub wind: Option<String>,
}

impl WeatherInfo {
    /// Field labels in display order.
    pub const FIELDS: [&'static str; 4] = ["Temperature", "Feels like", "Condition", "Wind"];

    /// `(label, value)` pairs in display order, including absent values.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            (Self::FIELDS[0], self.temperature.as_deref()),
            (Self::FIELDS[1], self.feels_like.as_deref()),
            (Self::FIELDS[2], self.condition.as_deref()),
            (Self::FIELDS[3], self.wind.as_deref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }
}

/// What the dispatcher hands to the output collaborator for each provider run.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub provider: String,
    pub title: String,
    pub location: Location,
    pub info: WeatherInfo,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_info_keeps_field_order() {
        let info = WeatherInfo {
            condition: Some("Cloudy".into()),
            ..WeatherInfo::default()
        };

        let fields = info.fields();
        assert_eq!(fields[0], ("Temperature", None));
        assert_eq!(fields[2], ("Condition", Some("Cloudy")));
        assert!(!info.is_empty());
        assert!(WeatherInfo::default().is_empty());
    }
}
