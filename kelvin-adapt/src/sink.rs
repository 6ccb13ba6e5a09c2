use kelvin_base::Result;
use kelvin_lang::Tab;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `tab` to `path` as CSV with a header row, creating missing parent
/// directories and replacing any existing file. Nulls become empty fields;
/// values are written exactly as stored.
pub fn write_csv(tab: &Tab, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let file = File::create(path)?;
    write_csv_to(tab, BufWriter::new(file))?;
    info!(path = %path.display(), rows = tab.rows(), cols = tab.cols().len(), "wrote csv");
    Ok(())
}

pub fn write_csv_to<W: Write>(tab: &Tab, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(tab.col_names())?;
    let mut record = Vec::with_capacity(tab.cols().len());
    for row in 0..tab.rows() {
        record.clear();
        record.extend(tab.cols().iter().map(|c| c.get(row).to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
