use crate::{Col, ColType, Tab, Val};
use kelvin_base::Result;

mod col;

// Four readings across two locations; one humidity cell is missing.
pub(crate) fn sample_tab() -> Result<Tab> {
    Tab::new(vec![
        Col::new("sensor_id", ColType::Int, [1i64, 2, 3, 4].map(Val::from))?,
        Col::new(
            "temperature",
            ColType::Flo,
            [17.5, 22.0, 30.0, 31.25].map(Val::flo),
        )?,
        Col::new(
            "humidity",
            ColType::Flo,
            [Val::flo(40.0), Val::Null, Val::flo(55.5), Val::flo(60.0)],
        )?,
        Col::new(
            "location",
            ColType::Str,
            ["BldgA", "BldgB", "BldgA", "BldgB"].map(Val::from),
        )?,
        Col::new(
            "timestamp",
            ColType::Str,
            [
                "2024-03-24 14:39:16",
                "2024-03-24 15:01:00",
                "2024-03-24T14:05:59",
                "2024-03-25 09:00",
            ]
            .map(Val::from),
        )?,
    ])
}
