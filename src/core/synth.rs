//! Substitute datasets used when a remote source is unavailable.
//!
//! Generators only promise a well-formed series of the right record shape;
//! the numbers are a plausible-looking demo, not a model.

use crate::domain::model::{EmissionsRecord, TimeSeriesPoint, WeatherEventRecord};
use rand::Rng;
use rand_distr::Normal;

pub const FIRST_YEAR: i32 = 1900;
pub const LAST_YEAR: i32 = 2023;
pub const FIRST_WEATHER_YEAR: i32 = 1990;

pub const EVENT_TYPES: [&str; 4] = ["Hurricane", "Flood", "Drought", "Extreme Temperature"];

/// Noisy linear warming trend, historical points only.
pub fn temperature<R: Rng>(rng: &mut R) -> Vec<TimeSeriesPoint> {
    let noise = Normal::new(0.0, 0.5).expect("constant standard deviation is finite");
    (FIRST_YEAR..=LAST_YEAR)
        .map(|year| {
            let trend = 15.0 + f64::from(year - FIRST_YEAR) * 0.01;
            TimeSeriesPoint::historical(year, trend + rng.sample(noise))
        })
        .collect()
}

/// Compounding emission and population growth per country.
pub fn emissions<R: Rng>(rng: &mut R, countries: &[String]) -> Vec<EmissionsRecord> {
    let mut records = Vec::with_capacity(countries.len() * (LAST_YEAR - FIRST_YEAR + 1) as usize);

    for country in countries {
        let base_emissions = rng.gen_range(100.0..1000.0);
        let growth_rate: f64 = rng.gen_range(1.01..1.03);
        let population_base = rng.gen_range(10e6..500e6);

        for year in FIRST_YEAR..=LAST_YEAR {
            let elapsed = year - FIRST_YEAR;
            let co2 = base_emissions * growth_rate.powi(elapsed);
            let population = population_base * 1.01f64.powi(elapsed);
            records.push(EmissionsRecord::new(country.clone(), year, co2, population));
        }
    }

    records
}

/// Gaussian-perturbed, slowly increasing yearly counts per event type.
pub fn weather_events<R: Rng>(rng: &mut R) -> Vec<WeatherEventRecord> {
    let mut events = Vec::new();

    for year in FIRST_WEATHER_YEAR..=LAST_YEAR {
        let mean = 10.0 + f64::from(year - FIRST_WEATHER_YEAR) * 0.5;
        let distribution = Normal::new(mean, 2.0).expect("constant standard deviation is finite");

        for event_type in EVENT_TYPES {
            let sampled: f64 = rng.sample(distribution);
            events.push(WeatherEventRecord {
                year,
                event_type: event_type.to_string(),
                count: sampled.trunc().max(0.0) as u32,
            });
        }
    }

    events
}
