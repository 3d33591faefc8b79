use crate::domain::model::{EmissionsRecord, GeoRecord, TimeSeriesPoint, WeatherEventRecord};
use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const TEMPERATURE_FILE: &str = "temperature_data.csv";
pub const EMISSIONS_FILE: &str = "emissions_data.csv";
pub const WEATHER_FILE: &str = "weather_events.csv";
pub const GEOGRAPHIC_FILE: &str = "geographic_data.csv";

/// A row type with a fixed column layout. `HEADERS` must match the
/// serialized field order.
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRecord for TimeSeriesPoint {
    const HEADERS: &'static [&'static str] = &["Year", "Temperature", "Type"];
}

impl CsvRecord for EmissionsRecord {
    const HEADERS: &'static [&'static str] =
        &["country", "year", "co2", "co2_per_capita", "population"];
}

impl CsvRecord for WeatherEventRecord {
    const HEADERS: &'static [&'static str] = &["Year", "Event_Type", "Count"];
}

impl CsvRecord for GeoRecord {
    const HEADERS: &'static [&'static str] = &["country", "co2", "lat", "lon"];
}

/// Encodes `records` as CSV. The header row is written even when there are
/// no records.
pub fn to_csv_bytes<T: CsvRecord>(records: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(T::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn from_csv_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
