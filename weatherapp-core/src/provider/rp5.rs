use crate::{
    drilldown::DrillLevel,
    model::{Location, WeatherInfo},
    provider::{
        Site,
        html::{self, Element, find, non_empty, with_classes, with_id},
    },
};

pub const NAME: &str = "rp5";
pub const TITLE: &str = "rp5.ua";
pub const DEFAULT_LOCATION_NAME: &str = "Brody";
pub const DEFAULT_LOCATION_URL: &str = "http://rp5.ua/%D0%9F%D0%BE%D0%B3%D0%BE%D0%B4%D0%B0_%D0%B2_%D0%91%D1%80%D0%BE%D0%B4%D0%B0%D1%85,_%D0%9B%D1%8C%D0%B2%D1%96%D0%B2%D1%81%D1%8C%D0%BA%D0%B0_%D0%BE%D0%B1%D0%BB%D0%B0%D1%81%D1%82%D1%8C";
pub const BROWSE_LOCATIONS: &str =
    "http://rp5.ua/%D0%9F%D0%BE%D0%B3%D0%BE%D0%B4%D0%B0_%D0%B2_%D1%81%D0%B2%D1%96%D1%82%D1%96";

const BASE_URL: &str = "http://rp5.ua/";
const LEVELS: &[DrillLevel] = &[DrillLevel::Country, DrillLevel::Region, DrillLevel::City];

/// rp5.ua: country map links, then region headings, then city links.
/// Regions without cities end the drill-down at the region.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rp5;

fn first_link(el: &Element<'_>) -> Option<(String, String)> {
    let anchor = el.find(|inner| inner.tag.eq_ignore_ascii_case("a"))?;
    let href = anchor.attr("href")?.trim();
    Some((non_empty(anchor.text())?, non_empty(href.to_string())?))
}

impl Site for Rp5 {
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
        match level {
            DrillLevel::Country | DrillLevel::Continent => {
                html::find_all(page, with_classes(&["country_map_links"]))
                    .iter()
                    .filter_map(first_link)
                    .collect()
            }
            DrillLevel::Region => html::find_all(page, |el| el.tag.eq_ignore_ascii_case("h3"))
                .iter()
                .filter_map(|heading| {
                    let anchor = heading.find(with_classes(&["href20"]))?;
                    let href = anchor.attr("href")?.trim();
                    Some((non_empty(anchor.text())?, non_empty(href.to_string())?))
                })
                .collect(),
            DrillLevel::City => html::find_all(page, with_classes(&["city_link"]))
                .iter()
                .filter_map(first_link)
                .collect(),
        }
    }

    fn parse_weather(&self, page: &str) -> WeatherInfo {
        let mut info = WeatherInfo::default();

        if let Some(archive) = find(page, with_id("archiveString")) {
            info.temperature = archive
                .find(with_id("ArchTemp"))
                .and_then(|temp| temp.find(with_classes(&["t_0"])))
                .map(|t| t.text())
                .and_then(non_empty);

            info.feels_like = archive
                .find(with_classes(&["TempStr"]))
                .and_then(|temp| temp.find(with_classes(&["t_0"])))
                .map(|t| t.text())
                .and_then(non_empty);
        }

        if let Some(short) = find(page, with_id("forecastShort-content")) {
            let text = short.text();
            let parts: Vec<&str> = text.split(',').map(str::trim).collect();
            info.condition = parts.get(2).map(|s| s.to_string()).and_then(non_empty);
            info.wind = parts
                .iter()
                .find(|part| part.to_lowercase().contains("wind") || part.contains("вітер"))
                .map(|s| s.to_string());
        }

        info
    }
}
