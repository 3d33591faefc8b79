use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a temperature point was observed or extrapolated from the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Historical,
    Prediction,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Historical => f.write_str("Historical"),
            SeriesKind::Prediction => f.write_str("Prediction"),
        }
    }
}

/// One yearly value of the global temperature series.
///
/// Serialized with the `Year,Temperature,Type` column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(rename = "Year")]
    pub period: i32,
    #[serde(rename = "Temperature")]
    pub value: f64,
    #[serde(rename = "Type")]
    pub series_kind: SeriesKind,
}

impl TimeSeriesPoint {
    pub fn historical(period: i32, value: f64) -> Self {
        Self {
            period,
            value,
            series_kind: SeriesKind::Historical,
        }
    }

    pub fn prediction(period: i32, value: f64) -> Self {
        Self {
            period,
            value,
            series_kind: SeriesKind::Prediction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsRecord {
    pub country: String,
    pub year: i32,
    pub co2: f64,
    pub co2_per_capita: f64,
    /// Empty in the CSV when the source did not report it.
    pub population: Option<f64>,
}

impl EmissionsRecord {
    /// Builds a record deriving `co2_per_capita` (tonnes per person, with
    /// `co2` in million tonnes).
    pub fn new(country: impl Into<String>, year: i32, co2: f64, population: f64) -> Self {
        Self {
            country: country.into(),
            year,
            co2,
            co2_per_capita: per_capita(co2, population),
            population: Some(population),
        }
    }
}

pub fn per_capita(co2: f64, population: f64) -> f64 {
    if population > 0.0 {
        co2 / population * 1e6
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherEventRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Event_Type")]
    pub event_type: String,
    #[serde(rename = "Count")]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub country: String,
    pub co2: f64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Synthetic,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Remote => f.write_str("remote"),
            DataOrigin::Synthetic => f.write_str("synthetic"),
        }
    }
}

/// A dataset together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub origin: DataOrigin,
    pub data: T,
}

impl<T> Sourced<T> {
    pub fn remote(data: T) -> Self {
        Self {
            origin: DataOrigin::Remote,
            data,
        }
    }

    pub fn synthetic(data: T) -> Self {
        Self {
            origin: DataOrigin::Synthetic,
            data,
        }
    }
}

/// Output of the extract phase. Temperature holds yearly means only; the
/// trend is added during transform.
#[derive(Debug, Clone)]
pub struct RawDatasets {
    pub temperature: Sourced<Vec<TimeSeriesPoint>>,
    pub emissions: Sourced<Vec<EmissionsRecord>>,
    pub weather: Sourced<Vec<WeatherEventRecord>>,
}

#[derive(Debug, Clone, Default)]
pub struct ClimateDatasets {
    pub temperature: Vec<TimeSeriesPoint>,
    pub emissions: Vec<EmissionsRecord>,
    pub weather: Vec<WeatherEventRecord>,
    pub geographic: Vec<GeoRecord>,
}
