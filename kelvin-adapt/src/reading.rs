// The sensor reading row as a plain struct, for building inputs in code
// (tests, generators) rather than from a file.

use crate::schema::Schema;
use kelvin_base::Result;
use kelvin_lang::{Tab, Val};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: i64,
    pub timestamp: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub location: Option<String>,
    pub sensor_type: Option<String>,
}

impl SensorReading {
    pub fn new(
        sensor_id: i64,
        timestamp: impl Into<String>,
        temperature: f64,
        humidity: f64,
        location: impl Into<String>,
        sensor_type: impl Into<String>,
    ) -> SensorReading {
        SensorReading {
            sensor_id,
            timestamp: timestamp.into(),
            temperature: Some(temperature),
            humidity: Some(humidity),
            location: Some(location.into()),
            sensor_type: Some(sensor_type.into()),
        }
    }

    fn vals(&self) -> [Val; 6] {
        [
            Val::Int(self.sensor_id),
            Val::str(self.timestamp.as_str()),
            self.temperature.into(),
            self.humidity.into(),
            self.location.clone().into(),
            self.sensor_type.clone().into(),
        ]
    }
}

/// A table laid out as `Schema::sensor_readings` declares.
pub fn readings_tab(readings: &[SensorReading]) -> Result<Tab> {
    let schema = Schema::sensor_readings();
    let mut cols = schema.empty_cols();
    for r in readings {
        for (col, v) in cols.iter_mut().zip(r.vals()) {
            col.push(v)?;
        }
    }
    Tab::new(cols)
}

/// Serializes readings as a CSV file that `read_csv` accepts under the
/// sensor readings schema.
pub fn write_readings<W: Write>(w: W, readings: &[SensorReading]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for r in readings {
        wtr.serialize(r)?;
    }
    if readings.is_empty() {
        wtr.write_record(Schema::sensor_readings().names())?;
    }
    wtr.flush()?;
    Ok(())
}
