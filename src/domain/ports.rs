use crate::domain::model::{ClimateDatasets, RawDatasets};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn temperature_url(&self) -> &str;
    fn emissions_url(&self) -> &str;
    /// No URL means the weather dataset is always synthesized.
    fn weather_url(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn max_attempts(&self) -> u32;
    fn base_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn forecast_horizon(&self) -> usize;
    fn countries(&self) -> &[String];
    fn min_year(&self) -> i32;
    fn seed(&self) -> Option<u64>;
    fn offline(&self) -> bool;
}

/// A single GET. Non-2xx statuses are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawDatasets>;
    async fn transform(&self, data: RawDatasets) -> Result<ClimateDatasets>;
    async fn load(&self, datasets: ClimateDatasets) -> Result<String>;
}
