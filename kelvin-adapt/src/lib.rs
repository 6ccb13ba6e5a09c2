// Adapters between tables and the outside world. Right now that means CSV:
// a declared schema, an ingester that enforces it row by row, and a sink
// that writes any table back out.

mod ingest;
mod reading;
mod schema;
mod sink;


pub use ingest::{read_csv, read_csv_from, IngestReport, RejectPolicy};
pub use reading::{readings_tab, write_readings, SensorReading};
pub use schema::{Field, Schema};
pub use sink::{write_csv, write_csv_to};
