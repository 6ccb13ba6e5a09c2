use chrono::Timelike;
use kelvin_base::{type_mismatch, Result};
use kelvin_eval::{dense_rank, group_aggregate, limit, pivot, AggSpec, OrderBy};
use kelvin_lang::{parse_timestamp, CmpOp, ColType, Pred, SortOrder, Tab, Val};
use tracing::info;

/// Stage names in run order; stage `n` (1-based) writes `task{n}_output.csv`.
pub const STAGES: [&str; 5] = [
    "explore",
    "filter_aggregate",
    "hourly_trend",
    "top_sensors",
    "pivot",
];

#[derive(Clone, Debug)]
pub struct Exploration {
    pub preview: Tab,
    pub total: usize,
    /// Distinct non-null locations, first-seen order.
    pub locations: Vec<Val>,
}

pub fn explore(readings: &Tab, preview_rows: usize) -> Result<Exploration> {
    let locations = readings.distinct_vals("location")?;
    info!(total = readings.rows(), locations = locations.len(), "explored");
    Ok(Exploration {
        preview: readings.head(preview_rows),
        total: readings.rows(),
        locations,
    })
}

#[derive(Clone, Debug)]
pub struct RangeSummary {
    pub in_range: usize,
    pub out_of_range: usize,
    pub by_location: Tab,
}

/// Counts readings inside and outside `[lo, hi]`, and averages temperature
/// and humidity per location over all readings, hottest location first.
/// Readings with no temperature fall in neither count.
pub fn filter_aggregate(readings: &Tab, lo: f64, hi: f64, scale: u32) -> Result<RangeSummary> {
    let in_range = readings.filter(&Pred::between("temperature", lo, hi))?;
    let out_of_range = readings.filter(
        &Pred::cmp("temperature", CmpOp::Lt, lo).or(Pred::cmp("temperature", CmpOp::Gt, hi)),
    )?;
    let by_location = group_aggregate(
        readings,
        &["location"],
        &[
            AggSpec::avg("avg_temperature", "temperature").rounded(scale),
            AggSpec::avg("avg_humidity", "humidity").rounded(scale),
        ],
        Some(&OrderBy::desc("avg_temperature")),
    )?;
    info!(
        in_range = in_range.rows(),
        out_of_range = out_of_range.rows(),
        locations = by_location.rows(),
        "range filtered"
    );
    Ok(RangeSummary {
        in_range: in_range.rows(),
        out_of_range: out_of_range.rows(),
        by_location,
    })
}

/// Replaces the `timestamp` text column with parsed timestamps and appends
/// `hour_of_day`. A timestamp that doesn't parse fails the whole table.
pub fn with_hour_of_day(readings: &Tab) -> Result<Tab> {
    let parsed = readings.derive_col("timestamp", ColType::Time, |row| {
        match row.get("timestamp")? {
            Val::Str(s) => parse_timestamp(&s).map(Val::Time).ok_or_else(|| {
                type_mismatch(
                    "derive_col",
                    "timestamp",
                    format!("row {}: `{s}` is not a date-time", row.index()),
                )
            }),
            v @ (Val::Time(_) | Val::Null) => Ok(v),
            v => Err(type_mismatch(
                "derive_col",
                "timestamp",
                format!("row {}: `{v}` is not a date-time", row.index()),
            )),
        }
    })?;
    parsed.derive_col("hour_of_day", ColType::Int, |row| {
        Ok(match row.get("timestamp")? {
            Val::Time(t) => Val::Int(i64::from(t.hour())),
            _ => Val::Null,
        })
    })
}

/// Average temperature per hour of day, earliest hour first.
pub fn hourly_trend(with_hours: &Tab, scale: u32) -> Result<Tab> {
    group_aggregate(
        with_hours,
        &["hour_of_day"],
        &[AggSpec::avg("avg_temp", "temperature").rounded(scale)],
        Some(&OrderBy::asc("hour_of_day")),
    )
}

/// The `top_n` rows of per-sensor average temperature, densely ranked
/// hottest first in `rank_temp`.
pub fn top_sensors(readings: &Tab, top_n: usize, scale: u32) -> Result<Tab> {
    let per_sensor = group_aggregate(
        readings,
        &["sensor_id"],
        &[AggSpec::avg("avg_temp", "temperature").rounded(scale)],
        None,
    )?;
    let ranked = dense_rank(&per_sensor, "avg_temp", SortOrder::Desc, "rank_temp")?;
    Ok(limit(&ranked, top_n))
}

/// Locations down, hours across, average temperature in each cell.
pub fn location_hour_pivot(with_hours: &Tab, scale: u32) -> Result<Tab> {
    pivot(
        with_hours,
        "location",
        "hour_of_day",
        &AggSpec::avg("avg_temp", "temperature").rounded(scale),
    )
}
