//! Observability hooks for the dispatch layer.
//!
//! `log_metric!` emits one structured key-value record per event (for example,
//! which backend a leaf resolved to). The `#[cfg(debug_assertions)]` attribute
//! compiles every call out of release builds. Records go through the `log` facade
//! at `debug` level under the `sortnest::metrics` target, so they show up once a
//! logger is installed, e.g. with `enable_verbose_logging`.

use crate::error::OrderingError;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

/// Logs a structured key-value metric record, only in debug builds.
///
/// ```ignore
/// log_metric!("event"="resolve_backend", "key_chain"="a/b", "backend"="ndarray");
/// ```
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            if log::log_enabled!(target: "sortnest::metrics", log::Level::Debug) {
                // Collect each pair as a JSON string fragment
                let mut parts = Vec::new();
                $(
                    parts.push(format!("\"{}\": \"{}\"", $key, $value));
                )+
                log::debug!(
                    target: "sortnest::metrics",
                    "SORTNEST_METRIC: {{ {} }}",
                    parts.join(", ")
                );
            }
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` logger at `Info` level (overridable through
/// `RUST_LOG`), writing to stderr or appending to `log_file`.
///
/// Only the first call installs a logger; later calls are no-ops. Fails only when
/// `log_file` cannot be opened.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), OrderingError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);
        builder.parse_default_env();

        // Custom formatter: just print the level, target and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file_is_an_io_error() {
        let missing_dir = Path::new("/nonexistent-sortnest-dir/log.txt");
        assert!(matches!(
            enable_verbose_logging(Some(missing_dir)),
            Err(OrderingError::Io(_))
        ));
    }

    #[test]
    fn test_metric_macro_accepts_mixed_values() {
        let count = 3;
        log_metric!("event" = "test", "count" = &count, "name" = "leaf");
    }
}
