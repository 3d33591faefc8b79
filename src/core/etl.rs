use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ETL process");

        tracing::info!("Extracting datasets");
        let raw_data = self.pipeline.extract().await?;

        tracing::info!("Transforming datasets");
        let datasets = self.pipeline.transform(raw_data).await?;

        tracing::info!("Loading datasets");
        let output_path = self.pipeline.load(datasets).await?;

        tracing::info!(
            output_path = %output_path,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ETL process finished"
        );
        Ok(output_path)
    }
}
