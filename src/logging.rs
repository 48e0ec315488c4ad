//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events: a `debug` span per render cycle, `trace` for
//! element construction and `warn` for failed event listeners. Applications that have no
//! subscriber of their own can call [`init`].

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogConfig;

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatted stderr subscriber (idempotent).
///
/// `RUST_LOG` takes precedence over [`LogConfig::level`]. Returns `false` when a global
/// subscriber was already set by someone else.
pub fn init(config: &LogConfig) -> bool {
    let mut installed = false;
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_target(true)
            .with_filter(filter);

        installed = tracing_subscriber::registry().with(console).try_init().is_ok();
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = LogConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
