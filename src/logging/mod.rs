//! Tracing subscriber setup.
//!
//! Output format follows `APP_ENV`: JSON lines in production, coloured text
//! elsewhere. `LOG_FORMAT=json|pretty` overrides that choice. Filtering comes
//! from `RUST_LOG`; trade records are emitted on the `trade_log` target and can
//! be filtered independently (e.g. `RUST_LOG=warn,trade_log=info`).

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Resolve the format from an explicit override, falling back to the environment name
    pub fn resolve(override_format: Option<&str>, environment: &str) -> Self {
        match override_format.map(|f| f.trim().to_ascii_lowercase()) {
            Some(f) if f == "json" => LogFormat::Json,
            Some(f) if f == "pretty" || f == "text" => LogFormat::Pretty,
            _ if matches!(environment, "production" | "prod") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let format = LogFormat::resolve(
        std::env::var("LOG_FORMAT").ok().as_deref(),
        &get_environment(),
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
