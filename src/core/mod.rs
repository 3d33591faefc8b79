pub mod csv_io;
pub mod datasets;
pub mod etl;
pub mod fetcher;
pub mod pipeline;
pub mod query;
pub mod synth;
pub mod trend;

pub use crate::domain::model::{
    ClimateDatasets, DataOrigin, EmissionsRecord, GeoRecord, RawDatasets, SeriesKind, Sourced,
    TimeSeriesPoint, WeatherEventRecord,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Sleeper, Storage, Transport};
pub use crate::utils::error::Result;
