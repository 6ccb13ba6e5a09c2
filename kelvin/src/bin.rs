use clap::Parser;
use kelvin::run_pipeline;
use kelvin_adapt::RejectPolicy;
use kelvin_admin::{init_logging, Config};
use kelvin_base::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "kelvin",
    version,
    about = "Runs the sensor readings analytics pipeline and writes one CSV per stage"
)]
struct Cli {
    /// JSON config file; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Readings CSV to analyze.
    #[arg(short, long, env = "KELVIN_INPUT")]
    input: Option<PathBuf>,

    /// Directory that receives task1_output.csv .. task5_output.csv.
    #[arg(short, long, env = "KELVIN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// What to do with malformed rows: `skip` or `fail-fast`.
    #[arg(long)]
    reject_policy: Option<RejectPolicy>,

    #[arg(long)]
    temp_lo: Option<f64>,

    #[arg(long)]
    temp_hi: Option<f64>,

    /// How many ranked sensors to keep.
    #[arg(long)]
    top_n: Option<usize>,

    #[arg(long)]
    preview_rows: Option<usize>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn load_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(v) = self.input {
            config.input = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.reject_policy {
            config.reject_policy = v;
        }
        if let Some(v) = self.temp_lo {
            config.temp_lo = v;
        }
        if let Some(v) = self.temp_hi {
            config.temp_hi = v;
        }
        if let Some(v) = self.top_n {
            config.top_n = v;
        }
        if let Some(v) = self.preview_rows {
            config.preview_rows = v;
        }
        if let Some(v) = self.log_level {
            config.log_level = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let config = match Cli::parse().load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kelvin: bad configuration: {e}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config.log_level);
    info!(input = %config.input.display(), output_dir = %config.output_dir.display(), "starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_pipeline(&config, &mut out) {
        Ok(report) => {
            info!(outputs = report.outputs.len(), "done");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{failure}");
            ExitCode::FAILURE
        }
    }
}
