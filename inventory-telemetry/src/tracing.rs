//! Tracing initialization.
//!
//! Logs go to stderr, filtered through `RUST_LOG` (default `info`). When
//! `APP_LOG_DIR` is set, a daily-rolling file appender is added and a
//! [`LogFlusher`] guard keeps its background writer alive; binaries must hold
//! the guard for the lifetime of the process.

use std::env;
use std::sync::Once;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable pointing at the directory for log files.
const LOG_DIR_ENV_NAME: &str = "APP_LOG_DIR";

/// Default directive applied when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Error)]
pub enum InitTracingError {
    #[error("failed to install the tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Keeps the non-blocking file writer alive until dropped.
///
/// Dropping the flusher flushes buffered log lines, so it must outlive all
/// logging in the binary.
#[must_use = "dropping the flusher stops log file writing"]
pub struct LogFlusher {
    _guard: Option<WorkerGuard>,
}

/// Initializes tracing for a service binary.
pub fn init_tracing(service_name: &str) -> Result<LogFlusher, InitTracingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match env::var(LOG_DIR_ENV_NAME) {
        Ok(log_dir) => {
            let appender =
                tracing_appender::rolling::daily(log_dir, format!("{service_name}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);

            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    ::tracing::info!(service = service_name, "tracing initialized");

    Ok(LogFlusher { _guard: guard })
}

/// Initializes a plain test subscriber once per process.
///
/// Safe to call from every test; repeated calls are no-ops.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
