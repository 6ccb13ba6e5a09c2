use crate::stage::{
    explore, filter_aggregate, hourly_trend, location_hour_pivot, top_sensors, with_hour_of_day,
    STAGES,
};
use kelvin_adapt::{read_csv, write_csv, IngestReport, Schema};
use kelvin_admin::Config;
use kelvin_base::{Error, Result};
use kelvin_lang::{Col, ColType, Tab, Val};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

// Result tables are shown in full up to this many rows.
const SHOW_ROWS: usize = 20;

/// A stage that didn't finish, and why. Outputs of the stages before it
/// have already been written and are left in place.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: &'static str,
    pub error: Error,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} failed: {}", self.stage, self.error)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub ingest: IngestReport,
    pub locations: Vec<Val>,
    pub in_range: usize,
    pub out_of_range: usize,
    /// Files written, in stage order.
    pub outputs: Vec<PathBuf>,
}

/// Where stage `n` (1-based) writes its result.
pub fn output_path(output_dir: &Path, n: usize) -> PathBuf {
    output_dir.join(format!("task{n}_output.csv"))
}

fn stage<T>(name: &'static str, f: impl FnOnce() -> Result<T>) -> std::result::Result<T, StageFailure> {
    let _span = info_span!("stage", name).entered();
    info!("starting");
    f().map_err(|error| StageFailure { stage: name, error })
}

fn show(out: &mut impl Write, title: &str, tab: &Tab, rows: usize) -> Result<()> {
    writeln!(out, "{title}")?;
    write!(out, "{}", tab.render(rows))?;
    writeln!(out)?;
    Ok(())
}

/// Runs all five stages against `config.input`, printing previews and
/// counts to `out` and writing `task1_output.csv` .. `task5_output.csv`
/// into `config.output_dir`. Stops at the first stage that fails.
pub fn run_pipeline(config: &Config, out: &mut impl Write) -> std::result::Result<Report, StageFailure> {
    stage("config", || config.validate())?;
    let [explore_name, aggregate_name, hourly_name, top_name, pivot_name] = STAGES;
    let mut report = Report::default();

    let readings = stage(explore_name, || {
        let (readings, ingest) =
            read_csv(&config.input, &Schema::sensor_readings(), config.reject_policy)?;
        report.ingest = ingest;
        let found = explore(&readings, config.preview_rows)?;
        show(out, "Readings:", &found.preview, config.preview_rows)?;
        writeln!(out, "Total Records: {}", found.total)?;
        if ingest.rejected > 0 {
            writeln!(out, "Rejected Records: {}", ingest.rejected)?;
        }
        let locations = Tab::new(vec![Col::new(
            "location",
            ColType::Str,
            found.locations.iter().cloned(),
        )?])?;
        show(out, "Distinct locations:", &locations, SHOW_ROWS)?;
        report.locations = found.locations;
        write_stage(&readings, config, 1, &mut report)?;
        Ok(readings)
    })?;

    stage(aggregate_name, || {
        let summary = filter_aggregate(&readings, config.temp_lo, config.temp_hi, config.scale)?;
        writeln!(out, "In-Range Count: {}", summary.in_range)?;
        writeln!(out, "Out-of-Range Count: {}", summary.out_of_range)?;
        show(out, "Averages by location:", &summary.by_location, SHOW_ROWS)?;
        report.in_range = summary.in_range;
        report.out_of_range = summary.out_of_range;
        write_stage(&summary.by_location, config, 2, &mut report)
    })?;

    let with_hours = stage(hourly_name, || {
        let with_hours = with_hour_of_day(&readings)?;
        let hourly = hourly_trend(&with_hours, config.scale)?;
        show(out, "Average temperature by hour:", &hourly, SHOW_ROWS)?;
        write_stage(&hourly, config, 3, &mut report)?;
        Ok(with_hours)
    })?;

    stage(top_name, || {
        let top = top_sensors(&with_hours, config.top_n, config.scale)?;
        show(out, "Hottest sensors:", &top, SHOW_ROWS)?;
        write_stage(&top, config, 4, &mut report)
    })?;

    stage(pivot_name, || {
        let wide = location_hour_pivot(&with_hours, config.scale)?;
        show(out, "Average temperature, location by hour:", &wide, SHOW_ROWS)?;
        write_stage(&wide, config, 5, &mut report)
    })?;

    info!(
        rows = report.ingest.rows,
        rejected = report.ingest.rejected,
        outputs = report.outputs.len(),
        "pipeline finished"
    );
    Ok(report)
}

fn write_stage(tab: &Tab, config: &Config, n: usize, report: &mut Report) -> Result<()> {
    let path = output_path(&config.output_dir, n);
    write_csv(tab, &path)?;
    report.outputs.push(path);
    Ok(())
}
