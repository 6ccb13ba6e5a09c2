use kelvin_base::Result;
use kelvin_lang::{Col, ColType, Tab, Val};

mod rank;

// (sensor_id, hour, temperature, location)
pub(crate) fn readings(rows: &[(i64, i64, f64, &str)]) -> Result<Tab> {
    Tab::new(vec![
        Col::new("sensor_id", ColType::Int, rows.iter().map(|r| Val::Int(r.0)))?,
        Col::new("hour_of_day", ColType::Int, rows.iter().map(|r| Val::Int(r.1)))?,
        Col::new("temperature", ColType::Flo, rows.iter().map(|r| Val::flo(r.2)))?,
        Col::new("location", ColType::Str, rows.iter().map(|r| Val::str(r.3)))?,
    ])
}

pub(crate) fn column(tab: &Tab, name: &str) -> Vec<Val> {
    tab.col(name).map(|c| c.iter().collect()).unwrap_or_default()
}
