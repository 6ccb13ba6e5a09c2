// Operator-facing setup: what a run is configured to do, and where its
// log output goes.

mod config;
mod logging;


pub use config::Config;
pub use logging::init_logging;
