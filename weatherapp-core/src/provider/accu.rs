use crate::{
    drilldown::DrillLevel,
    model::{Location, WeatherInfo},
    provider::{
        Site,
        html::{self, find, non_empty, tag_with_class, text_in, with_classes, with_id},
    },
};

pub const NAME: &str = "accu";
pub const TITLE: &str = "AccuWeather";
pub const DEFAULT_LOCATION_NAME: &str = "Brody";
pub const DEFAULT_LOCATION_URL: &str =
    "https://www.accuweather.com/uk/ua/brody/324506/weather-forecast/324506";
pub const BROWSE_LOCATIONS: &str = "https://www.accuweather.com/uk/browse-locations";

const BASE_URL: &str = "https://www.accuweather.com/";
const LEVELS: &[DrillLevel] =
    &[DrillLevel::Continent, DrillLevel::Country, DrillLevel::Region, DrillLevel::City];

/// AccuWeather. Every browse level uses the same `li.drilldown` list, and
/// the forecast page links to a separate "current conditions" page.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuWeather;

impl Site for AccuWeather {
    fn name(&self) -> &'static str {
        NAME
    }

    fn title(&self) -> &'static str {
        TITLE
    }

    fn default_location(&self) -> Location {
        Location::new(DEFAULT_LOCATION_NAME, DEFAULT_LOCATION_URL)
    }

    fn base_url(&self) -> &'static str {
        BASE_URL
    }

    fn browse_url(&self) -> &'static str {
        BROWSE_LOCATIONS
    }

    fn levels(&self) -> &'static [DrillLevel] {
        LEVELS
    }

    fn parse_locations(&self, _level: DrillLevel, page: &str) -> Vec<(String, String)> {
        html::find_all(page, |el| el.tag.eq_ignore_ascii_case("li") && el.has_class("drilldown"))
            .into_iter()
            .filter_map(|item| {
                let href = item.find(|el| el.tag.eq_ignore_ascii_case("a"))?.attr("href")?;
                let label = item
                    .find(|el| el.tag.eq_ignore_ascii_case("em"))
                    .map(|em| em.text())
                    .unwrap_or_else(|| item.text());
                Some((non_empty(label)?, href.to_string()))
            })
            .collect()
    }

    fn detail_link(&self, page: &str) -> Option<String> {
        let current = find(page, with_classes(&["current", "first", "cl"]))?;
        let href = current.find(|el| el.tag.eq_ignore_ascii_case("a"))?.attr("href")?;
        non_empty(href.trim().to_string())
    }

    fn parse_weather(&self, page: &str) -> WeatherInfo {
        let Some(details) = find(page, with_id("detail-now")) else {
            return WeatherInfo::default();
        };

        WeatherInfo {
            temperature: text_in(&details, tag_with_class("span", "large-temp")),
            feels_like: text_in(&details, with_classes(&["small-temp"])),
            condition: text_in(&details, tag_with_class("span", "cond")),
            wind: text_in(&details, with_classes(&["wind-point"]))
                .or_else(|| text_in(&details, tag_with_class("li", "wind"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSE: &str = r#"
        <ul class="articles">
          <li class="drilldown cl"><a href="https://www.accuweather.com/uk/browse-locations/eur"><em>Європа</em><span>12</span></a></li>
          <li class="drilldown cl"><a href="/uk/browse-locations/asi"><em>Азія</em></a></li>
          <li class="other"><a href="/ignored"><em>Ignored</em></a></li>
        </ul>
    "#;

    const FORECAST: &str = r#"
        <div class="panel-list">
          <div class="day current first cl"><a href="https://www.accuweather.com/uk/ua/brody/324506/current-weather/324506">Now</a></div>
          <div class="night cl"><a href="/tonight">Tonight</a></div>
        </div>
    "#;

    const CURRENT: &str = r#"
        <div id="detail-now">
          <div class="temp">
            <span class="large-temp">7&deg;</span>
            <em class="small-temp">RealFeel&reg; 4&deg;</em>
          </div>
          <span class="cond">Mostly cloudy</span>
          <div class="wind-point">NW 13 km/h</div>
        </div>
    "#;

    #[test]
    fn parses_drilldown_list() {
        let locations = AccuWeather.parse_locations(DrillLevel::Continent, BROWSE);

        assert_eq!(
            locations,
            [
                ("Європа".to_string(), "https://www.accuweather.com/uk/browse-locations/eur".to_string()),
                ("Азія".to_string(), "/uk/browse-locations/asi".to_string()),
            ]
        );
    }

    #[test]
    fn finds_current_conditions_link() {
        assert_eq!(
            AccuWeather.detail_link(FORECAST).as_deref(),
            Some("https://www.accuweather.com/uk/ua/brody/324506/current-weather/324506")
        );
        assert_eq!(AccuWeather.detail_link("<html></html>"), None);
    }

    #[test]
    fn parses_current_conditions() {
        let info = AccuWeather.parse_weather(CURRENT);

        assert_eq!(info.temperature.as_deref(), Some("7°"));
        assert_eq!(info.feels_like.as_deref(), Some("RealFeel® 4°"));
        assert_eq!(info.condition.as_deref(), Some("Mostly cloudy"));
        assert_eq!(info.wind.as_deref(), Some("NW 13 km/h"));
    }

    #[test]
    fn missing_markup_gives_partial_info() {
        let info = AccuWeather.parse_weather(r#"<div id="detail-now"><span class="cond">Fog</span></div>"#);

        assert_eq!(info, WeatherInfo { condition: Some("Fog".into()), ..WeatherInfo::default() });
        assert!(AccuWeather.parse_weather("").is_empty());
    }
}
