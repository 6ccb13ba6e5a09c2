// CSV ingestion against a declared schema.
//
// The header must name the schema's fields in order. Each data row is then
// parsed field by field; a row is rejected whole if any field is null where
// the schema forbids it, fails to parse as the field's type, or if the row
// has the wrong number of fields. What happens to a rejected row is decided
// once per read by the RejectPolicy, never row by row.

use crate::schema::{Field, Schema};
use kelvin_base::{EngineError, Error, Result};
use kelvin_lang::{parse_timestamp, ColType, Tab, Val};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectPolicy {
    /// Drop the row, count it, and log it at `warn`.
    #[default]
    Skip,
    /// Stop at the first bad row with a SchemaViolation.
    FailFast,
}

impl FromStr for RejectPolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(RejectPolicy::Skip),
            "fail-fast" | "failfast" | "fail_fast" => Ok(RejectPolicy::FailFast),
            other => Err(format!(
                "unknown reject policy `{other}`, expected `skip` or `fail-fast`"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IngestReport {
    /// Rows that made it into the table.
    pub rows: usize,
    pub rejected: usize,
}

// Why a row was turned away. Not an Error: under the skip policy these are
// routine and shouldn't each raise an error-level event.
struct Reject {
    column: String,
    reason: String,
}

pub fn read_csv(path: &Path, schema: &Schema, policy: RejectPolicy) -> Result<(Tab, IngestReport)> {
    info!(path = %path.display(), ?policy, "reading csv");
    let file = File::open(path)?;
    read_csv_from(BufReader::new(file), schema, policy)
}

/// Reads CSV text from `rdr`. Data rows are numbered from 1; a header that
/// doesn't match the schema is reported as row 0.
pub fn read_csv_from<R: Read>(
    rdr: R,
    schema: &Schema,
    policy: RejectPolicy,
) -> Result<(Tab, IngestReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);
    check_header(rdr.byte_headers()?, schema)?;

    let mut cols = schema.empty_cols();
    let mut report = IngestReport::default();
    let mut vals = Vec::with_capacity(schema.len());
    // Byte records, so that a field that isn't UTF-8 rejects its row under
    // the policy instead of failing the read. Only reader errors are fatal.
    for (i, rec) in rdr.byte_records().enumerate() {
        let row = i + 1;
        let rec = rec?;
        vals.clear();
        match parse_record(&rec, schema, &mut vals) {
            Ok(()) => {
                for (col, v) in cols.iter_mut().zip(vals.drain(..)) {
                    col.push(v)?;
                }
                report.rows += 1;
            }
            Err(Reject { column, reason }) => match policy {
                RejectPolicy::Skip => {
                    warn!(row, column = %column, reason = %reason, "rejected row");
                    report.rejected += 1;
                }
                RejectPolicy::FailFast => {
                    return Err(Error::new(EngineError::SchemaViolation {
                        row,
                        column,
                        reason,
                    }))
                }
            },
        }
    }
    info!(rows = report.rows, rejected = report.rejected, "ingested");
    Ok((Tab::new(cols)?, report))
}

fn check_header(header: &csv::ByteRecord, schema: &Schema) -> Result<()> {
    let found: Vec<String> = header
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();
    let expected: Vec<&str> = schema.names().collect();
    if found == expected {
        debug!(fields = expected.len(), "header matches schema");
        return Ok(());
    }
    let column = expected
        .iter()
        .zip(found.iter())
        .find(|(e, f)| **e != f.as_str())
        .map(|(e, _)| e.to_string())
        .or_else(|| expected.get(found.len()).map(|e| e.to_string()))
        .unwrap_or_else(|| found.get(expected.len()).map_or(String::new(), |f| f.to_string()));
    Err(Error::new(EngineError::SchemaViolation {
        row: 0,
        column,
        reason: format!(
            "header is `{}`, expected `{}`",
            found.join(","),
            expected.join(",")
        ),
    }))
}

fn parse_record(
    rec: &csv::ByteRecord,
    schema: &Schema,
    out: &mut Vec<Val>,
) -> std::result::Result<(), Reject> {
    if rec.len() != schema.len() {
        let column = match schema.fields().get(rec.len()) {
            Some(missing) => missing.name.clone(),
            None => format!("#{}", schema.len() + 1),
        };
        return Err(Reject {
            column,
            reason: format!("row has {} fields, expected {}", rec.len(), schema.len()),
        });
    }
    for (bytes, field) in rec.iter().zip(schema.fields()) {
        let parsed = std::str::from_utf8(bytes)
            .map_err(|e| format!("field is not valid UTF-8: {e}"))
            .and_then(|raw| parse_field(raw, field));
        out.push(parsed.map_err(|reason| Reject {
            column: field.name.clone(),
            reason,
        })?);
    }
    Ok(())
}

// Only an empty field is null for strings, so text that is all spaces
// survives a write and re-read. Other types ignore surrounding spaces.
fn parse_field(raw: &str, field: &Field) -> std::result::Result<Val, String> {
    let s = match field.ty {
        ColType::Str => raw,
        _ => raw.trim(),
    };
    if s.is_empty() {
        return if field.nullable {
            Ok(Val::Null)
        } else {
            Err("null in a non-nullable field".to_string())
        };
    }
    let bad = |e: &dyn std::fmt::Display| format!("`{s}` is not a valid {}: {e}", field.ty);
    match field.ty {
        ColType::Int => s.parse::<i64>().map(Val::Int).map_err(|e| bad(&e)),
        ColType::Flo => s.parse::<f64>().map(Val::flo).map_err(|e| bad(&e)),
        ColType::Str => Ok(Val::str(raw)),
        ColType::Time => parse_timestamp(s)
            .map(Val::Time)
            .ok_or_else(|| bad(&"unrecognized date-time format")),
    }
}
