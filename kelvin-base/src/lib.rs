mod bitmap;
mod error;


pub use bitmap::Bitmap;
pub use error::{column_not_found, err, type_mismatch, EngineError, Error, ErrorKind, Result};

// Partition maps and distinct-sets across the workspace hash with rapidhash.
pub use rapidhash::{RapidHashMap as FastMap, RapidHashSet as FastSet};
