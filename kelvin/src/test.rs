use kelvin_adapt::{readings_tab, SensorReading};
use kelvin_base::Result;
use kelvin_lang::{Tab, Val};


// (sensor_id, timestamp, temperature, location); humidity is fixed at 50.
pub(crate) fn readings(rows: &[(i64, &str, f64, &str)]) -> Result<Tab> {
    let readings: Vec<SensorReading> = rows
        .iter()
        .map(|&(id, ts, temp, loc)| SensorReading::new(id, ts, temp, 50.0, loc, "TypeA"))
        .collect();
    readings_tab(&readings)
}

pub(crate) fn column(tab: &Tab, name: &str) -> Vec<Val> {
    tab.col(name).map(|c| c.iter().collect()).unwrap_or_default()
}
