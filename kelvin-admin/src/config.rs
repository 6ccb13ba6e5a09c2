use kelvin_adapt::RejectPolicy;
use kelvin_base::{err, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a pipeline run needs to know. Every field has a default, so
/// a config file only has to name what it changes; command-line flags are
/// applied on top of whatever the file says.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub reject_policy: RejectPolicy,
    /// Inclusive temperature range for the in-range filter.
    pub temp_lo: f64,
    pub temp_hi: f64,
    pub top_n: usize,
    /// Decimal places kept in every average.
    pub scale: u32,
    pub preview_rows: usize,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            input: PathBuf::from("sensor_data.csv"),
            output_dir: PathBuf::from("."),
            reject_policy: RejectPolicy::Skip,
            temp_lo: 18.0,
            temp_hi: 30.0,
            top_n: 5,
            scale: 2,
            preview_rows: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Config> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        let config = Config::from_json_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.temp_lo.is_finite() || !self.temp_hi.is_finite() {
            return Err(err("temperature bounds must be finite"));
        }
        if self.temp_lo > self.temp_hi {
            return Err(err(format!(
                "temperature range is empty: lower bound {} is above upper bound {}",
                self.temp_lo, self.temp_hi
            )));
        }
        if self.top_n == 0 {
            return Err(err("top_n must be at least 1"));
        }
        Ok(())
    }
}
