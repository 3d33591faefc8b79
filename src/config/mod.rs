pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::datasets::{default_countries, EMISSIONS_URL, TEMPERATURE_URL};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "climate-etl")]
#[command(about = "Fetch climate datasets, extend the temperature trend and write CSV files")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = TEMPERATURE_URL)]
    pub temperature_url: String,

    #[arg(long, default_value = EMISSIONS_URL)]
    pub emissions_url: String,

    /// Weather events are synthesized when no URL is given
    #[arg(long)]
    pub weather_url: Option<String>,

    #[arg(long, default_value = "./data")]
    pub output_path: String,

    #[arg(long, default_value = "3")]
    pub max_attempts: u32,

    #[arg(long, default_value = "1000")]
    pub base_delay_ms: u64,

    #[arg(long, default_value = "10")]
    pub timeout_secs: u64,

    /// Number of years to extrapolate past the last observation
    #[arg(long, default_value = "30")]
    pub horizon: usize,

    #[arg(long, value_delimiter = ',', default_values_t = default_countries())]
    pub countries: Vec<String>,

    #[arg(long, default_value = "1900")]
    pub min_year: i32,

    /// Seed for synthesized data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the network and synthesize every dataset
    #[arg(long)]
    pub offline: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn temperature_url(&self) -> &str {
        &self.temperature_url
    }

    fn emissions_url(&self) -> &str {
        &self.emissions_url
    }

    fn weather_url(&self) -> Option<&str> {
        self.weather_url.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn forecast_horizon(&self) -> usize {
        self.horizon
    }

    fn countries(&self) -> &[String] {
        &self.countries
    }

    fn min_year(&self) -> i32 {
        self.min_year
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn offline(&self) -> bool {
        self.offline
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if !self.offline {
            validation::validate_url("temperature_url", &self.temperature_url)?;
            validation::validate_url("emissions_url", &self.emissions_url)?;
            if let Some(url) = &self.weather_url {
                validation::validate_url("weather_url", url)?;
            }
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("max_attempts", u64::from(self.max_attempts), 1)?;
        validation::validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        validation::validate_range("horizon", self.horizon, 0, 500)?;
        validation::validate_range("min_year", self.min_year, 1750, 2100)?;
        validation::validate_non_empty_list("countries", &self.countries)?;
        Ok(())
    }
}
