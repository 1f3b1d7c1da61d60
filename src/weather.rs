// Copyright 2025 Cowboy AI, LLC.

//! Weather demo domain
//!
//! The sample read-heavy record type: forecasts filtered by location or by
//! month, sorted by date, temperature, or summary.

use crate::entity::{EntityId, Record};
use crate::requests::{FilterDefinition, SortDefinition};
use crate::sorting::{RecordSorter, SortComparer};
use crate::specification::{FilterProvider, Specification};
use crate::state_code::StateCode;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Marker for weather forecast keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherForecastMarker;

/// Marker for weather location keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherLocationMarker;

/// Typed key for weather forecasts
pub type WeatherForecastId = EntityId<WeatherForecastMarker>;

/// Typed key for weather locations
pub type WeatherLocationId = EntityId<WeatherLocationMarker>;

/// A daily forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Stable identity key
    pub uid: WeatherForecastId,
    /// Location this forecast belongs to
    pub location_id: WeatherLocationId,
    /// Forecast date
    pub date: NaiveDate,
    /// Temperature in degrees Celsius
    pub temperature_c: i32,
    /// One-word outlook
    pub summary: String,
    /// Persistence lifecycle state
    pub state: StateCode,
}

impl WeatherForecast {
    /// Create a new forecast, marked `New`
    pub fn new(
        location_id: WeatherLocationId,
        date: NaiveDate,
        temperature_c: i32,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            uid: WeatherForecastId::new(),
            location_id,
            date,
            temperature_c,
            summary: summary.into(),
            state: StateCode::New,
        }
    }

    /// Copy with a different temperature
    pub fn with_temperature(&self, temperature_c: i32) -> Self {
        Self {
            temperature_c,
            ..self.clone()
        }
    }

    /// Copy with a different summary
    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..self.clone()
        }
    }
}

impl Record for WeatherForecast {
    type Marker = WeatherForecastMarker;

    fn uid(&self) -> WeatherForecastId {
        self.uid
    }

    fn state(&self) -> StateCode {
        self.state
    }

    fn with_state(&self, state: StateCode) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    fn record_name() -> &'static str {
        "WeatherForecast"
    }
}

/// Filter name: forecasts for one location, payload is the location GUID
pub const FORECASTS_BY_LOCATION: &str = "ByLocation";

/// Filter name: forecasts in one month, payload is JSON `{"month":7,"year":2025}`
pub const FORECASTS_BY_MONTH: &str = "ByMonth";

/// Forecasts belonging to one location
pub struct ForecastsByLocation {
    location_id: WeatherLocationId,
}

impl ForecastsByLocation {
    /// Create the specification for a location key
    pub fn new(location_id: WeatherLocationId) -> Self {
        Self { location_id }
    }

    /// Parse the specification from a GUID payload
    pub fn from_data(data: &str) -> Option<Self> {
        let uuid = Uuid::parse_str(data).ok()?;
        Some(Self::new(WeatherLocationId::from_uuid(uuid)))
    }
}

impl Specification<WeatherForecast> for ForecastsByLocation {
    fn is_satisfied_by(&self, candidate: &WeatherForecast) -> bool {
        candidate.location_id == self.location_id
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MonthYear {
    month: u32,
    year: i32,
}

/// Forecasts falling in one calendar month
pub struct ForecastsByMonth {
    month: u32,
    year: i32,
}

impl ForecastsByMonth {
    /// Create the specification for a month and year
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// Parse the specification from a JSON month/year payload
    pub fn from_data(data: &str) -> Option<Self> {
        let parsed: MonthYear = serde_json::from_str(data).ok()?;
        Some(Self::new(parsed.month, parsed.year))
    }

    /// The JSON payload for a month and year, for building definitions
    pub fn data(month: u32, year: i32) -> String {
        serde_json::to_string(&MonthYear { month, year }).expect("month/year payload serializes")
    }
}

impl Specification<WeatherForecast> for ForecastsByMonth {
    fn is_satisfied_by(&self, candidate: &WeatherForecast) -> bool {
        candidate.date.month() == self.month && candidate.date.year() == self.year
    }
}

/// Filter provider for weather forecasts
///
/// Unknown names and unparsable payloads resolve to no specification; the
/// pipeline skips those definitions.
pub struct WeatherForecastFilterProvider;

impl FilterProvider<WeatherForecast> for WeatherForecastFilterProvider {
    fn specification(
        &self,
        definition: &FilterDefinition,
    ) -> Option<Box<dyn Specification<WeatherForecast>>> {
        let spec: Option<Box<dyn Specification<WeatherForecast>>> =
            match definition.filter_name.as_str() {
                FORECASTS_BY_LOCATION => ForecastsByLocation::from_data(&definition.filter_data)
                    .map(|s| Box::new(s) as Box<dyn Specification<WeatherForecast>>),
                FORECASTS_BY_MONTH => ForecastsByMonth::from_data(&definition.filter_data)
                    .map(|s| Box::new(s) as Box<dyn Specification<WeatherForecast>>),
                _ => None,
            };
        if spec.is_none() {
            warn!(
                filter = %definition.filter_name,
                data = %definition.filter_data,
                "weather filter definition did not resolve"
            );
        }
        spec
    }
}

/// Sorter for weather forecasts: Date (default, descending), TemperatureC, Summary
pub struct WeatherForecastSorter;

impl RecordSorter<WeatherForecast> for WeatherForecastSorter {
    fn comparer(&self, field: &str) -> Option<SortComparer<WeatherForecast>> {
        match field {
            "Date" => Some(|a, b| a.date.cmp(&b.date)),
            "TemperatureC" => Some(|a, b| a.temperature_c.cmp(&b.temperature_c)),
            "Summary" => Some(|a, b| a.summary.cmp(&b.summary)),
            _ => None,
        }
    }

    fn default_sort(&self) -> SortDefinition {
        SortDefinition::descending("Date")
    }
}
