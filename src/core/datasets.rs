//! Parsers for the remote source formats and the geographic projection.

use crate::domain::model::{
    per_capita, EmissionsRecord, GeoRecord, TimeSeriesPoint, WeatherEventRecord,
};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const TEMPERATURE_URL: &str = "https://data.giss.nasa.gov/gistemp/tabledata_v4/GLB.Ts+dSST.csv";
pub const EMISSIONS_URL: &str =
    "https://raw.githubusercontent.com/owid/co2-data/master/owid-co2-data.csv";

pub const DEFAULT_MIN_YEAR: i32 = 1900;

pub const MAJOR_COUNTRIES: [&str; 8] = [
    "United States",
    "China",
    "India",
    "Russian Federation",
    "Japan",
    "Germany",
    "United Kingdom",
    "Canada",
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Approximate centroids (lat, lon) used to place countries on a map.
const COUNTRY_COORDS: [(&str, f64, f64); 8] = [
    ("United States", 37.0902, -95.7129),
    ("China", 35.8617, 104.1954),
    ("India", 20.5937, 78.9629),
    ("Russian Federation", 61.5240, 105.3188),
    ("Japan", 36.2048, 138.2529),
    ("Germany", 51.1657, 10.4515),
    ("United Kingdom", 55.3781, -3.4360),
    ("Canada", 56.1304, -106.3468),
];

pub fn default_countries() -> Vec<String> {
    MAJOR_COUNTRIES.iter().map(|c| c.to_string()).collect()
}

pub fn country_coordinates(country: &str) -> Option<(f64, f64)> {
    COUNTRY_COORDS
        .iter()
        .find(|(name, _, _)| *name == country)
        .map(|&(_, lat, lon)| (lat, lon))
}

fn parse_failure(dataset: &str, message: impl Into<String>) -> EtlError {
    EtlError::ParseFailure {
        dataset: dataset.to_string(),
        message: message.into(),
    }
}

/// Reads the GISTEMP global means table into yearly averages.
///
/// The first line is a title. Monthly cells holding `***` or nothing are
/// skipped, and a year with no usable month is dropped.
pub fn parse_temperature(payload: &[u8]) -> Result<Vec<TimeSeriesPoint>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| parse_failure("temperature", format!("payload is not UTF-8: {}", e)))?;
    let table = text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| parse_failure("temperature", "missing header row"))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| parse_failure("temperature", e.to_string()))?
        .clone();
    let year_idx = headers
        .iter()
        .position(|h| h == "Year")
        .ok_or_else(|| parse_failure("temperature", "no Year column"))?;
    let month_idx: Vec<usize> = MONTHS
        .iter()
        .filter_map(|m| headers.iter().position(|h| h == *m))
        .collect();
    if month_idx.is_empty() {
        return Err(parse_failure("temperature", "no monthly columns"));
    }

    let mut points = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_failure("temperature", e.to_string()))?;
        let Some(year) = row.get(year_idx).and_then(|y| y.parse::<i32>().ok()) else {
            continue;
        };

        let values: Vec<f64> = month_idx
            .iter()
            .filter_map(|&i| row.get(i))
            .filter_map(|cell| cell.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            continue;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        points.push(TimeSeriesPoint::historical(year, mean));
    }

    if points.is_empty() {
        return Err(parse_failure("temperature", "no yearly values found"));
    }
    points.sort_by_key(|p| p.period);
    Ok(points)
}

#[derive(Debug, Deserialize)]
struct OwidRow {
    country: String,
    year: i32,
    co2: Option<f64>,
    co2_per_capita: Option<f64>,
    population: Option<f64>,
}

/// Reads the OWID CO2 table, keeping `countries` from `min_year` on.
///
/// Rows without `co2` are skipped. A missing per-capita value is derived
/// from population; rows lacking both are skipped.
pub fn parse_emissions(
    payload: &[u8],
    countries: &[String],
    min_year: i32,
) -> Result<Vec<EmissionsRecord>> {
    let mut reader = csv::Reader::from_reader(payload);
    let mut records = Vec::new();

    for row in reader.deserialize::<OwidRow>() {
        let row = row.map_err(|e| parse_failure("emissions", e.to_string()))?;
        if row.year < min_year || !countries.iter().any(|c| *c == row.country) {
            continue;
        }
        let Some(co2) = row.co2 else {
            continue;
        };

        let co2_per_capita = match (row.co2_per_capita, row.population) {
            (Some(value), _) => value,
            (None, Some(population)) if population > 0.0 => per_capita(co2, population),
            _ => continue,
        };

        records.push(EmissionsRecord {
            country: row.country,
            year: row.year,
            co2,
            co2_per_capita,
            population: row.population,
        });
    }

    if records.is_empty() {
        return Err(parse_failure(
            "emissions",
            "no rows matched the configured countries",
        ));
    }
    Ok(records)
}

pub fn parse_weather_events(payload: &[u8]) -> Result<Vec<WeatherEventRecord>> {
    let records: Vec<WeatherEventRecord> = csv::Reader::from_reader(payload)
        .deserialize()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e: csv::Error| parse_failure("weather", e.to_string()))?;

    if records.is_empty() {
        return Err(parse_failure("weather", "no events found"));
    }
    Ok(records)
}

/// Emissions of the most recent year, placed at each country's centroid.
pub fn geographic_points(emissions: &[EmissionsRecord]) -> Vec<GeoRecord> {
    let Some(latest) = emissions.iter().map(|r| r.year).max() else {
        return Vec::new();
    };

    // BTreeMap keeps the output sorted and one point per country.
    let mut by_country = BTreeMap::new();
    for record in emissions.iter().filter(|r| r.year == latest) {
        match country_coordinates(&record.country) {
            Some((lat, lon)) => {
                by_country.insert(
                    record.country.clone(),
                    GeoRecord {
                        country: record.country.clone(),
                        co2: record.co2,
                        lat,
                        lon,
                    },
                );
            }
            None => tracing::debug!("No coordinates for {}, skipping", record.country),
        }
    }

    by_country.into_values().collect()
}
