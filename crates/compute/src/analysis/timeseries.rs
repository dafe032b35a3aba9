//! Station observations to chart series.
//!
//! Observation features carry `parameter`, `value`, `units_of_measure` and
//! `datetime` properties. A station reports several parameters; the chart
//! shows the one with the most usable values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use formats::{Feature, FeatureCollection};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::statistics::SeriesSummary;

/// Station identity pulled from a clicked feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationSelection {
    pub station_code: String,
    pub city: Option<String>,
}

impl StationSelection {
    /// `None` when the feature has no `station_code`.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let station_code = feature.property_text("station_code")?;
        if station_code.trim().is_empty() {
            return None;
        }
        Some(Self {
            station_code,
            city: feature.property_text("city"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub values: Vec<f64>,
    /// One per value, `Mon D, YYYY`.
    pub labels: Vec<String>,
    pub parameter: Option<String>,
    pub units: Option<String>,
    pub station: Option<StationSelection>,
    pub summary: Option<SeriesSummary>,
}

impl ChartSeries {
    pub fn empty(station: Option<StationSelection>) -> Self {
        Self {
            station,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

struct Observation {
    at: Option<DateTime<Utc>>,
    value: Option<f64>,
    units: Option<String>,
}

/// Picks the parameter with the most valid observations and returns its
/// values in time order.
///
/// Observations are ordered by time before grouping, so parameters are
/// encountered in order of their earliest observation; undated points sort
/// last. Parameters are ranked by how many values parse to a finite number
/// and ties go to the first parameter encountered. Points whose datetime does
/// not parse are then dropped from the winner.
pub fn build_series(collection: &FeatureCollection, station: Option<StationSelection>) -> ChartSeries {
    let mut rows: Vec<(String, Observation)> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let parameter = feature.property_text("parameter")?;
            let observation = Observation {
                at: feature
                    .property_text("datetime")
                    .as_deref()
                    .and_then(parse_observation_time),
                value: feature.property_f64("value").filter(|v| v.is_finite()),
                units: feature.property_text("units_of_measure"),
            };
            Some((parameter, observation))
        })
        .collect();
    rows.sort_by_key(|(_, o)| (o.at.is_none(), o.at));

    let mut groups: IndexMap<String, Vec<Observation>> = IndexMap::new();
    for (parameter, observation) in rows {
        groups.entry(parameter).or_default().push(observation);
    }

    let mut best: Option<(&String, usize)> = None;
    for (parameter, observations) in &groups {
        let valid = observations.iter().filter(|o| o.value.is_some()).count();
        debug!(parameter = %parameter, valid, "parameter candidate");
        if valid > best.map_or(0, |(_, n)| n) {
            best = Some((parameter, valid));
        }
    }
    let Some((parameter, _)) = best else {
        return ChartSeries::empty(station);
    };

    let observations = &groups[parameter];
    let mut points: Vec<(DateTime<Utc>, f64)> = observations
        .iter()
        .filter_map(|o| Some((o.at?, o.value?)))
        .collect();
    points.sort_by_key(|(at, _)| *at);

    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let labels = points.iter().map(|(at, _)| chart_label(at)).collect();
    let summary = SeriesSummary::of(&values);

    ChartSeries {
        values,
        labels,
        parameter: Some(parameter.clone()),
        units: observations.iter().find_map(|o| o.units.clone()),
        station,
        summary,
    }
}

/// `Jan 5, 2024`.
pub fn chart_label(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

pub fn parse_observation_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
