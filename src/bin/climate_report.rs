use anyhow::{bail, Context};
use clap::Parser;
use climate_etl::core::query::{
    aggregate_events, emissions_in_years, event_types, filter_years, latest_year,
    select_countries,
};
use climate_etl::core::SeriesKind;
use climate_etl::utils::logger;
use climate_etl::{load_datasets, LocalStorage};

#[derive(Parser)]
#[command(name = "climate-report")]
#[command(about = "Summarize the CSV files written by climate-etl")]
struct Args {
    /// Directory holding the CSV files
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// First year to include
    #[arg(long, default_value = "1880")]
    from: i32,

    /// Last year to include
    #[arg(long, default_value = "2100")]
    to: i32,

    /// Countries to include (all when omitted)
    #[arg(long, value_delimiter = ',')]
    country: Vec<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if args.from > args.to {
        bail!("--from ({}) must not be after --to ({})", args.from, args.to);
    }
    let years = args.from..=args.to;

    let storage = LocalStorage::new(&args.data_dir);
    let datasets = load_datasets(&storage)
        .await
        .with_context(|| format!("failed to load datasets from {}", args.data_dir))?;
    tracing::debug!("Loaded datasets from {}", args.data_dir);

    let temperature = filter_years(&datasets.temperature, years.clone());
    println!("Global temperature ({}-{})", args.from, args.to);
    for kind in [SeriesKind::Historical, SeriesKind::Prediction] {
        let values: Vec<f64> = temperature
            .iter()
            .filter(|p| p.series_kind == kind)
            .map(|p| p.value)
            .collect();
        if values.is_empty() {
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        println!(
            "  {:<10} {:>4} points, mean {:.3}",
            kind.to_string(),
            values.len(),
            mean
        );
    }

    let selected = select_countries(&datasets.emissions, &args.country);
    let emissions = emissions_in_years(&selected, years.clone());
    if let Some(year) = latest_year(&emissions) {
        println!("CO2 emissions in {}", year);
        for record in emissions.iter().filter(|r| r.year == year) {
            println!(
                "  {:<20} {:>12.1} total, {:>8.3} per capita",
                record.country, record.co2, record.co2_per_capita
            );
        }
    }

    let events: Vec<_> = datasets
        .weather
        .into_iter()
        .filter(|e| years.contains(&e.year))
        .collect();
    let totals = aggregate_events(&events);
    println!("Extreme weather events");
    for event_type in event_types(&totals) {
        let total: u64 = totals
            .iter()
            .filter(|t| t.event_type == event_type)
            .map(|t| u64::from(t.count))
            .sum();
        println!("  {:<20} {:>6}", event_type, total);
    }

    if !datasets.geographic.is_empty() {
        println!("Mapped countries: {}", datasets.geographic.len());
    }

    Ok(())
}
