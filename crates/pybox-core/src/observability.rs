//! Tracing initialisation. Call once at process startup.
//!
//! Uses `config::ObservabilityConfig` for PYBOX_QUIET, PYBOX_LOG_LEVEL and
//! PYBOX_LOG_JSON. Library callers that bring their own subscriber simply
//! skip this; `try_init` makes double-initialisation harmless.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialise the global tracing subscriber.
/// When PYBOX_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "pybox=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
