//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::infrastructure::paths;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber writing to a rotating log file.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently does nothing if that fails (logging is optional)
/// - Safe to call multiple times; only the first call takes effect
///
/// # Example
///
/// ```rust
/// use popcalc::observability::init_tracing;
/// use popcalc::Config;
///
/// let dir = std::env::temp_dir().join("popcalc-doc");
/// let config = Config {
///     data_dir: dir,
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or("info");
        EnvFilter::new(level)
    });

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let writer = FileWriter::new(paths::log_file(&config.data_dir));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
