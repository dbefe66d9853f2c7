use crate::{
    drilldown::DrillLevel,
    model::{Location, WeatherInfo},
    provider::{
        Site,
        html::{self, find, links, non_empty, tag_with_class, with_classes, with_id},
    },
};

pub const NAME: &str = "sinoptik";
pub const TITLE: &str = "sinoptik.ua";
pub const DEFAULT_LOCATION_NAME: &str = "Brody";
pub const DEFAULT_LOCATION_URL: &str =
    "https://ua.sinoptik.ua/%D0%BF%D0%BE%D0%B3%D0%BE%D0%B4%D0%B0-%D0%B1%D1%80%D0%BE%D0%B4%D0%B8";
pub const BROWSE_LOCATIONS: &str =
    "https://ua.sinoptik.ua/%D1%83%D0%BA%D1%80%D0%B0%D1%97%D0%BD%D0%B0";

const BASE_URL: &str = "https://ua.sinoptik.ua/";
const LEVELS: &[DrillLevel] =
    &[DrillLevel::Continent, DrillLevel::Country, DrillLevel::Region, DrillLevel::City];

/// sinoptik.ua: continents in a small-font block, countries and regions in
/// `.maxHeight` lists, cities in the bottom map column. Links are
/// protocol-relative.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sinoptik;

impl Site for Sinoptik {
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

    fn parse_locations(&self, level: DrillLevel, page: &str) -> Vec<(String, String)> {
        let block = match level {
            DrillLevel::Continent => find(page, |el| {
                el.tag.eq_ignore_ascii_case("div")
                    && el.attr("style").is_some_and(|style| style.replace(' ', "").contains("font-size:12px"))
            }),
            DrillLevel::Country | DrillLevel::Region => find(page, with_classes(&["maxHeight"])),
            DrillLevel::City => {
                find(page, with_classes(&["mapBotCol"])).and_then(|col| col.find(with_classes(&["clearfix"])))
            }
        };

        block.map(|el| links(el.inner)).unwrap_or_default()
    }

    fn parse_weather(&self, page: &str) -> WeatherInfo {
        let Some(today) = find(page, with_id("bd1c")) else {
            return WeatherInfo::default();
        };

        WeatherInfo {
            temperature: today
                .find(tag_with_class("p", "today-temp"))
                .map(|p| p.text())
                .and_then(non_empty),
            feels_like: html::find(page, with_classes(&["temperatureSens"]))
                .and_then(|row| row.find(|el| el.tag.eq_ignore_ascii_case("td")))
                .map(|td| td.text())
                .and_then(non_empty),
            condition: today
                .find(|el| el.tag.eq_ignore_ascii_case("img"))
                .and_then(|img| img.attr("alt"))
                .map(|alt| alt.trim().to_string())
                .and_then(non_empty),
            wind: None,
        }
    }
}
