//! Filters and groupings applied to loaded datasets before display.

use crate::domain::model::{EmissionsRecord, TimeSeriesPoint, WeatherEventRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

pub fn filter_years(points: &[TimeSeriesPoint], years: RangeInclusive<i32>) -> Vec<TimeSeriesPoint> {
    points
        .iter()
        .filter(|p| years.contains(&p.period))
        .cloned()
        .collect()
}

/// Records of the named countries, in their original order. An empty
/// selection keeps everything.
pub fn select_countries(records: &[EmissionsRecord], countries: &[String]) -> Vec<EmissionsRecord> {
    records
        .iter()
        .filter(|r| countries.is_empty() || countries.iter().any(|c| *c == r.country))
        .cloned()
        .collect()
}

pub fn emissions_in_years(
    records: &[EmissionsRecord],
    years: RangeInclusive<i32>,
) -> Vec<EmissionsRecord> {
    records
        .iter()
        .filter(|r| years.contains(&r.year))
        .cloned()
        .collect()
}

/// Sums counts per (year, event type), ordered by year then type.
pub fn aggregate_events(records: &[WeatherEventRecord]) -> Vec<WeatherEventRecord> {
    let mut totals: BTreeMap<(i32, &str), u32> = BTreeMap::new();
    for record in records {
        let total = totals.entry((record.year, record.event_type.as_str())).or_default();
        *total = total.saturating_add(record.count);
    }

    totals
        .into_iter()
        .map(|((year, event_type), count)| WeatherEventRecord {
            year,
            event_type: event_type.to_string(),
            count,
        })
        .collect()
}

pub fn event_types(records: &[WeatherEventRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.event_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn latest_year(records: &[EmissionsRecord]) -> Option<i32> {
    records.iter().map(|r| r.year).max()
}
