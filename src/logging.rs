use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`)
///
/// `log` records from dependencies are forwarded into tracing. Safe to call more than once
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = fmt().with_env_filter(filter).with_target(true).finish();

        if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("unable to set global tracing subscriber: {error}");
        }

        if let Err(error) = tracing_log::LogTracer::init() {
            tracing::warn!("unable to forward log records: {error}");
        }
    });
}
