pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    etl::EtlEngine,
    fetcher::{FetchFailure, Fetcher, RetryPolicy, RetryState},
    pipeline::{load_datasets, ClimatePipeline},
    trend::{fit_and_extrapolate, LinearTrend},
};
pub use crate::utils::error::{EtlError, Result};
