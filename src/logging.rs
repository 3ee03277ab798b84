//! Logging and tracing setup for elfquery.
//!
//! Library code only emits `tracing` events; the binary installs a
//! subscriber once at startup. Output goes to stderr so query results on
//! stdout stay clean.

use std::sync::Once;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Verbosity flag count to a default level
pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG` wins over the level picked on the command line.
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Initialize the global tracing subscriber.
///
/// Subsequent calls are ignored.
pub fn init_tracing(level: Level) {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt_layer)
            .try_init();

        debug!(%level, "elfquery tracing initialized");
    });
}

/// Initialize tracing with JSON lines for structured logging.
pub fn init_tracing_json(level: Level) {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt_layer)
            .try_init();

        debug!(%level, "elfquery tracing initialized (JSON mode)");
    });
}
