use climate_etl::core::csv_io::{EMISSIONS_FILE, GEOGRAPHIC_FILE, TEMPERATURE_FILE, WEATHER_FILE};
use climate_etl::core::SeriesKind;
use climate_etl::{load_datasets, ClimatePipeline, EtlEngine, LocalStorage, TomlConfig};
use httpmock::prelude::*;
use tempfile::TempDir;

const GISTEMP: &str = "Land-Ocean: Global Means
Year,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec,J-D,D-N,DJF,MAM,JJA,SON
2018,.82,.85,.89,.89,.82,.77,.82,.76,.80,.99,.78,.90,.84,.83,.83,.87,.78,.86
2019,.93,.95,1.17,1.01,.85,.90,.95,.95,.92,1.00,.99,1.09,.98,.96,.90,1.01,.93,.97
2020,1.17,1.24,1.17,1.13,1.01,.92,.90,.87,.98,.88,1.10,.81,1.01,1.04,1.17,1.10,.90,.99
2021,.81,.64,.88,.76,.78,.84,.92,.82,.92,.99,.93,.86,.85,.84,.75,.81,.86,.95
";

const OWID: &str = "country,year,iso_code,population,gdp,co2,co2_per_capita
China,2021,CHN,1425893504,,11472.369,8.046
China,2022,CHN,1425887360,,11396.777,7.993
India,2022,IND,1417173120,,2829.644,1.997
Canada,2022,CAN,38454328,,547.931,14.249
World,2022,OWID_WRL,7975105024,,37149.785,4.658
";

fn config_for(server: &MockServer, output_path: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[sources]
temperature = "{base}/gistemp.csv"
emissions = "{base}/owid-co2-data.csv"

[fetch]
max_attempts = 3
base_delay_ms = 1
timeout_seconds = 5

[forecast]
horizon = 10

[filter]
countries = ["China", "India", "Canada"]

[output]
path = "{output}"

[synthesis]
seed = 2024
"#,
        base = server.base_url(),
        output = output_path.replace('\\', "/"),
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_with_remote_sources() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let temp_mock = server.mock(|when, then| {
        when.method(GET).path("/gistemp.csv");
        then.status(200).header("Content-Type", "text/csv").body(GISTEMP);
    });
    let co2_mock = server.mock(|when, then| {
        when.method(GET).path("/owid-co2-data.csv");
        then.status(200).header("Content-Type", "text/csv").body(OWID);
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ClimatePipeline::new(storage.clone(), config).unwrap();

    let result = EtlEngine::new(pipeline).run().await;

    temp_mock.assert();
    co2_mock.assert();
    assert_eq!(result.unwrap(), output_path);

    for file in [TEMPERATURE_FILE, EMISSIONS_FILE, WEATHER_FILE, GEOGRAPHIC_FILE] {
        assert!(temp_dir.path().join(file).exists(), "{} missing", file);
    }

    let datasets = load_datasets(&storage).await.unwrap();

    let historical: Vec<i32> = datasets
        .temperature
        .iter()
        .filter(|p| p.series_kind == SeriesKind::Historical)
        .map(|p| p.period)
        .collect();
    assert_eq!(historical, vec![2018, 2019, 2020, 2021]);

    let predictions: Vec<i32> = datasets
        .temperature
        .iter()
        .filter(|p| p.series_kind == SeriesKind::Prediction)
        .map(|p| p.period)
        .collect();
    assert_eq!(predictions, (2022..=2031).collect::<Vec<_>>());

    // "World" is not a configured country.
    assert_eq!(datasets.emissions.len(), 4);
    assert!(datasets.emissions.iter().all(|r| r.country != "World"));

    let geo_countries: Vec<&str> = datasets
        .geographic
        .iter()
        .map(|g| g.country.as_str())
        .collect();
    assert_eq!(geo_countries, vec!["Canada", "China", "India"]);

    assert!(!datasets.weather.is_empty());

    let header = std::fs::read_to_string(temp_dir.path().join(EMISSIONS_FILE)).unwrap();
    assert!(header.starts_with("country,year,co2,co2_per_capita,population\n"));
}

#[tokio::test]
async fn test_end_to_end_with_unreachable_sources() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let temp_mock = server.mock(|when, then| {
        when.method(GET).path("/gistemp.csv");
        then.status(500);
    });
    let co2_mock = server.mock(|when, then| {
        when.method(GET).path("/owid-co2-data.csv");
        then.status(502);
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ClimatePipeline::new(storage.clone(), config).unwrap();

    // Still succeeds: every dataset is synthesized.
    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_ok());

    temp_mock.assert_hits(3);
    co2_mock.assert_hits(3);

    let datasets = load_datasets(&storage).await.unwrap();
    assert_eq!(datasets.temperature.first().unwrap().period, 1900);
    assert_eq!(datasets.temperature.last().unwrap().period, 2033);
    assert_eq!(datasets.emissions.len(), 3 * 124);
    assert_eq!(datasets.geographic.len(), 3);
}

#[tokio::test]
async fn test_rerun_overwrites_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    std::fs::write(
        temp_dir.path().join(TEMPERATURE_FILE),
        "stale content that must disappear",
    )
    .unwrap();

    let config = TomlConfig::from_toml_str(&format!(
        "[output]\npath = \"{}\"\n\n[synthesis]\noffline = true\nseed = 1\n",
        output_path.replace('\\', "/")
    ))
    .unwrap();

    let pipeline = ClimatePipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    EtlEngine::new(pipeline).run().await.unwrap();

    let content = std::fs::read_to_string(temp_dir.path().join(TEMPERATURE_FILE)).unwrap();
    assert!(content.starts_with("Year,Temperature,Type\n1900,"));
    assert!(!content.contains("stale"));
}

#[tokio::test]
async fn test_seeded_offline_runs_are_reproducible() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [&first, &second] {
        let path = dir.path().to_str().unwrap().replace('\\', "/");
        let config = TomlConfig::from_toml_str(&format!(
            "[output]\npath = \"{}\"\n\n[synthesis]\noffline = true\nseed = 77\n",
            path
        ))
        .unwrap();
        let pipeline = ClimatePipeline::new(LocalStorage::new(dir.path()), config).unwrap();
        EtlEngine::new(pipeline).run().await.unwrap();
    }

    for file in [TEMPERATURE_FILE, EMISSIONS_FILE, WEATHER_FILE, GEOGRAPHIC_FILE] {
        let a = std::fs::read(first.path().join(file)).unwrap();
        let b = std::fs::read(second.path().join(file)).unwrap();
        assert_eq!(a, b, "{} differs between seeded runs", file);
    }
}

#[tokio::test]
async fn test_unwritable_output_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "file in the way").unwrap();
    let output_path = blocker.join("data");

    let config = TomlConfig::from_toml_str("[synthesis]\noffline = true\nseed = 5\n").unwrap();
    let pipeline = ClimatePipeline::new(LocalStorage::new(&output_path), config).unwrap();

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, climate_etl::EtlError::IoError(_)));
    assert_eq!(
        err.severity(),
        climate_etl::utils::error::ErrorSeverity::Critical
    );
}
