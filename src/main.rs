use clap::Parser;
use climate_etl::core::ConfigProvider;
use climate_etl::utils::error::ErrorSeverity;
use climate_etl::utils::{logger, validation::Validate};
use climate_etl::{ClimatePipeline, CliConfig, EtlEngine, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting climate-etl");

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML");
                    1
                }
            }
        }
        None => {
            tracing::debug!("CLI config: {:?}", cli);
            run(cli).await
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    let storage = LocalStorage::new(config.output_path());
    let result = match ClimatePipeline::new(storage, config) {
        Ok(pipeline) => EtlEngine::new(pipeline).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output_path) => {
            println!("✅ Climate datasets written to: {}", output_path);
            0
        }
        Err(e) => {
            tracing::error!(
                "ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    }
}
