//! Observability: process log setup and request access logging.

pub mod access_log;

use tracing_subscriber::{fmt, EnvFilter};

pub use access_log::{AccessLog, AccessLogLayer};

/// Install the global fmt subscriber. `RUST_LOG` wins over `fallback`; an
/// unparsable `RUST_LOG` is reported once logging is up.
pub fn init_tracing(fallback: &str) {
    let (filter, env_err) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(e) => {
            let filter = EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new("info"));
            let set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
            (filter, set.then_some(e))
        }
    };
    fmt().with_env_filter(filter).init();

    if let Some(e) = env_err {
        tracing::warn!(error = %e, fallback, "ignoring invalid RUST_LOG");
    }
}
