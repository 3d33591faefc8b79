use crate::core::datasets::{default_countries, DEFAULT_MIN_YEAR, EMISSIONS_URL, TEMPERATURE_URL};
use crate::core::fetcher::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// File-based configuration. Every section is optional and falls back to
/// the same defaults as the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub forecast: ForecastConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub temperature: String,
    pub emissions: String,
    pub weather: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE_URL.to_string(),
            emissions: EMISSIONS_URL.to_string(),
            weather: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub countries: Vec<String>,
    pub min_year: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
            min_year: DEFAULT_MIN_YEAR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub seed: Option<u64>,
    pub offline: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are
    /// left as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn temperature_url(&self) -> &str {
        &self.sources.temperature
    }

    fn emissions_url(&self) -> &str {
        &self.sources.emissions
    }

    fn weather_url(&self) -> Option<&str> {
        self.sources.weather.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn max_attempts(&self) -> u32 {
        self.fetch.max_attempts
    }

    fn base_delay(&self) -> Duration {
        Duration::from_millis(self.fetch.base_delay_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_seconds)
    }

    fn forecast_horizon(&self) -> usize {
        self.forecast.horizon
    }

    fn countries(&self) -> &[String] {
        &self.filter.countries
    }

    fn min_year(&self) -> i32 {
        self.filter.min_year
    }

    fn seed(&self) -> Option<u64> {
        self.synthesis.seed
    }

    fn offline(&self) -> bool {
        self.synthesis.offline
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if !self.synthesis.offline {
            validation::validate_url("sources.temperature", &self.sources.temperature)?;
            validation::validate_url("sources.emissions", &self.sources.emissions)?;
            if let Some(url) = &self.sources.weather {
                validation::validate_url("sources.weather", url)?;
            }
        }
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_positive_number(
            "fetch.max_attempts",
            u64::from(self.fetch.max_attempts),
            1,
        )?;
        validation::validate_positive_number("fetch.timeout_seconds", self.fetch.timeout_seconds, 1)?;
        validation::validate_range("forecast.horizon", self.forecast.horizon, 0, 500)?;
        validation::validate_range("filter.min_year", self.filter.min_year, 1750, 2100)?;
        validation::validate_non_empty_list("filter.countries", &self.filter.countries)?;
        Ok(())
    }
}
