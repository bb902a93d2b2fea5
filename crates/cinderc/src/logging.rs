//! Tracing setup for `cinderc`.
//!
//! Logging is off unless `CINDER_LOG` (or `RUST_LOG`) is set. The filter uses
//! the usual `RUST_LOG` syntax, e.g. `CINDER_LOG=cinder_compiler=trace`.
//! `CINDER_LOG_FORMAT=json` switches to one JSON object per event.
//!
//! All output goes to stderr so it never mixes with the token dump on stdout.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LOG_ENV: &str = "CINDER_LOG";
const FORMAT_ENV: &str = "CINDER_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `CINDER_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global tracing subscriber, if logging was requested.
pub fn init() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::parse(&std::env::var(FORMAT_ENV).unwrap_or_default());

    match format {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
