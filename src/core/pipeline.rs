use crate::core::csv_io::{
    from_csv_bytes, to_csv_bytes, CsvRecord, EMISSIONS_FILE, GEOGRAPHIC_FILE, TEMPERATURE_FILE,
    WEATHER_FILE,
};
use crate::core::datasets::{
    geographic_points, parse_emissions, parse_temperature, parse_weather_events,
};
use crate::core::fetcher::{Fetcher, HttpTransport, RetryPolicy, TokioSleeper};
use crate::core::trend::fit_and_extrapolate;
use crate::core::{synth, ConfigProvider, Pipeline, Sleeper, Storage, Transport};
use crate::domain::model::{
    ClimateDatasets, EmissionsRecord, RawDatasets, Sourced, TimeSeriesPoint, WeatherEventRecord,
};
use crate::utils::error::{EtlError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TEMPERATURE_STREAM: u64 = 0;
const EMISSIONS_STREAM: u64 = 1;
const WEATHER_STREAM: u64 = 2;

pub struct ClimatePipeline<
    S: Storage,
    C: ConfigProvider,
    T: Transport = HttpTransport,
    Z: Sleeper = TokioSleeper,
> {
    storage: S,
    config: C,
    fetcher: Fetcher<T, Z>,
}

impl<S: Storage, C: ConfigProvider> ClimatePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let policy = RetryPolicy::new(config.max_attempts(), config.base_delay())?;
        let fetcher = Fetcher::http(policy, config.request_timeout())?;
        Ok(Self::with_fetcher(storage, config, fetcher))
    }
}

impl<S: Storage, C: ConfigProvider, T: Transport, Z: Sleeper> ClimatePipeline<S, C, T, Z> {
    pub fn with_fetcher(storage: S, config: C, fetcher: Fetcher<T, Z>) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }

    /// Independent generator per dataset so a seeded run does not change
    /// when one dataset switches between remote and synthetic.
    fn rng(&self, stream: u64) -> StdRng {
        match self.config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    /// Fetches and parses one dataset. Any failure is logged and turned
    /// into `None` so the caller can synthesize a substitute.
    async fn acquire<R, F>(&self, dataset: &str, url: Option<&str>, parse: F) -> Option<R>
    where
        R: Send,
        F: FnOnce(&[u8]) -> Result<R> + Send,
    {
        if self.config.offline() {
            tracing::info!(dataset, "Offline mode, skipping fetch");
            return None;
        }
        let Some(url) = url else {
            tracing::info!(dataset, "No source configured");
            return None;
        };

        let payload = match self.fetcher.fetch(url).await {
            Ok(payload) => payload,
            Err(failure) => {
                let error = EtlError::from(failure);
                tracing::warn!(dataset, error = %error, "Using synthesized data");
                return None;
            }
        };

        match parse(&payload) {
            Ok(data) => Some(data),
            Err(error) => {
                tracing::warn!(dataset, error = %error, "Using synthesized data");
                None
            }
        }
    }

    async fn acquire_temperature(&self) -> Sourced<Vec<TimeSeriesPoint>> {
        match self
            .acquire("temperature", Some(self.config.temperature_url()), parse_temperature)
            .await
        {
            Some(points) => Sourced::remote(points),
            None => Sourced::synthetic(self.synthetic_temperature()),
        }
    }

    async fn acquire_emissions(&self) -> Sourced<Vec<EmissionsRecord>> {
        let countries = self.config.countries();
        let min_year = self.config.min_year();
        match self
            .acquire("emissions", Some(self.config.emissions_url()), |payload| {
                parse_emissions(payload, countries, min_year)
            })
            .await
        {
            Some(records) => Sourced::remote(records),
            None => {
                let mut rng = self.rng(EMISSIONS_STREAM);
                Sourced::synthetic(synth::emissions(&mut rng, countries))
            }
        }
    }

    async fn acquire_weather(&self) -> Sourced<Vec<WeatherEventRecord>> {
        match self
            .acquire("weather", self.config.weather_url(), parse_weather_events)
            .await
        {
            Some(events) => Sourced::remote(events),
            None => {
                let mut rng = self.rng(WEATHER_STREAM);
                Sourced::synthetic(synth::weather_events(&mut rng))
            }
        }
    }

    fn synthetic_temperature(&self) -> Vec<TimeSeriesPoint> {
        let mut rng = self.rng(TEMPERATURE_STREAM);
        synth::temperature(&mut rng)
    }

    fn extend_temperature(&self, history: &[TimeSeriesPoint]) -> Result<Vec<TimeSeriesPoint>> {
        let horizon = self.config.forecast_horizon();
        match fit_and_extrapolate(history, horizon) {
            Ok(series) => Ok(series),
            Err(error @ EtlError::InsufficientData { .. }) => {
                tracing::warn!(error = %error, "Cannot fit temperature trend, using synthesized history");
                fit_and_extrapolate(&self.synthetic_temperature(), horizon)
            }
            Err(error) => Err(error),
        }
    }

    async fn write_dataset<R: CsvRecord + Sync>(&self, file: &str, records: &[R]) -> Result<()> {
        let data = to_csv_bytes(records)?;
        tracing::debug!("Writing {} ({} records, {} bytes)", file, records.len(), data.len());
        self.storage.write_file(file, &data).await
    }
}

#[async_trait::async_trait]
impl<S, C, T, Z> Pipeline for ClimatePipeline<S, C, T, Z>
where
    S: Storage,
    C: ConfigProvider,
    T: Transport,
    Z: Sleeper,
{
    async fn extract(&self) -> Result<RawDatasets> {
        let temperature = self.acquire_temperature().await;
        let emissions = self.acquire_emissions().await;
        let weather = self.acquire_weather().await;

        tracing::info!(
            temperature = %temperature.origin,
            emissions = %emissions.origin,
            weather = %weather.origin,
            "Datasets acquired"
        );

        Ok(RawDatasets {
            temperature,
            emissions,
            weather,
        })
    }

    async fn transform(&self, data: RawDatasets) -> Result<ClimateDatasets> {
        let temperature = self.extend_temperature(&data.temperature.data)?;
        let geographic = geographic_points(&data.emissions.data);

        tracing::info!(
            temperature_points = temperature.len(),
            emissions_records = data.emissions.data.len(),
            weather_records = data.weather.data.len(),
            geographic_points = geographic.len(),
            "Datasets transformed"
        );

        Ok(ClimateDatasets {
            temperature,
            emissions: data.emissions.data,
            weather: data.weather.data,
            geographic,
        })
    }

    async fn load(&self, datasets: ClimateDatasets) -> Result<String> {
        self.write_dataset(TEMPERATURE_FILE, &datasets.temperature).await?;
        self.write_dataset(EMISSIONS_FILE, &datasets.emissions).await?;
        self.write_dataset(WEATHER_FILE, &datasets.weather).await?;
        self.write_dataset(GEOGRAPHIC_FILE, &datasets.geographic).await?;

        Ok(self.config.output_path().to_string())
    }
}

/// Reads back the four CSV files written by [`ClimatePipeline::load`].
pub async fn load_datasets<S: Storage>(storage: &S) -> Result<ClimateDatasets> {
    Ok(ClimateDatasets {
        temperature: from_csv_bytes(&storage.read_file(TEMPERATURE_FILE).await?)?,
        emissions: from_csv_bytes(&storage.read_file(EMISSIONS_FILE).await?)?,
        weather: from_csv_bytes(&storage.read_file(WEATHER_FILE).await?)?,
        geographic: from_csv_bytes(&storage.read_file(GEOGRAPHIC_FILE).await?)?,
    })
}
