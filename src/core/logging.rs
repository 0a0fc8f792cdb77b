//! Logging Initialization
//!
//! Installs a `tracing` subscriber writing to stderr and bridges the `log`
//! macros used throughout the library into it. Stdout stays reserved for
//! flattened output.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` wins over the configured directive, and an
/// invalid directive falls back to `warn`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A stderr logger, human-readable or JSON lines.
/// 2. An `EnvFilter` from `RUST_LOG` or the configured directive.
/// 3. Redirects standard `log` crate events to `tracing`.
///
/// Safe to call more than once; later calls report and keep the first
/// subscriber.
pub fn init(config: &LoggingConfig) {
    let (json_layer, text_layer) = if config.json {
        let layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(true);
        (Some(layer), None)
    } else {
        let layer = fmt::layer().with_writer(io::stderr).with_target(false);
        (None, Some(layer))
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(&config.filter))
        .with(json_layer)
        .with(text_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
        return;
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }
}
