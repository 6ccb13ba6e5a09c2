use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the process-wide tracing subscriber. `RUST_LOG` wins when set;
/// otherwise `default_level` (e.g. `info` or `kelvin=debug`) is used. Only
/// the first call has any effect, and a subscriber installed by someone
/// else (a test harness, say) is left alone.
pub fn init_logging(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
