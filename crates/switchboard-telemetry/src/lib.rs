//! Logging setup for Switchboard
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a single
//! fmt layer writing to stderr, so command output on stdout stays clean.

use anyhow::Context as _;
use switchboard_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve the effective filter directive
///
/// An explicit override wins, then `RUST_LOG`, then the configured filter.
///
/// # Errors
///
/// Returns an error if the winning directive does not parse
pub fn resolve_filter(config: &TelemetryConfig, override_filter: Option<&str>) -> anyhow::Result<EnvFilter> {
    if let Some(directive) = override_filter {
        return EnvFilter::try_new(directive).with_context(|| format!("invalid log filter `{directive}`"));
    }

    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directive) if !directive.is_empty() => {
            EnvFilter::try_new(&directive).with_context(|| format!("invalid RUST_LOG `{directive}`"))
        }
        _ => EnvFilter::try_new(&config.filter).with_context(|| format!("invalid telemetry.filter `{}`", config.filter)),
    }
}

/// Install the global subscriber
///
/// Events are written synchronously to stderr, so nothing needs flushing at
/// shutdown.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed
pub fn init(config: &TelemetryConfig, override_filter: Option<&str>) -> anyhow::Result<()> {
    let filter = resolve_filter(config, override_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_target(true)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .context("failed to install log subscriber")?;
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("failed to install log subscriber")?;
        }
    }

    Ok(())
}
