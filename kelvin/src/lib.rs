// The sensor analytics pipeline: five stages over one readings table.
//
// Each stage is a plain function from tables to tables (stage.rs); the
// pipeline (pipeline.rs) threads one readings table through them in order,
// prints what each stage found and writes each stage's result to its own
// CSV file. There is no session object: every table a stage needs is
// passed to it explicitly.

mod pipeline;
mod stage;

#[cfg(test)]
mod test;

pub use pipeline::{output_path, run_pipeline, Report, StageFailure};
pub use stage::{
    explore, filter_aggregate, hourly_trend, location_hour_pivot, top_sensors, with_hour_of_day,
    Exploration, RangeSummary, STAGES,
};
