//! Logging setup for the onboarding CLI.
//!
//! Logs go to stderr so that stdout carries only the JSON result.

use std::io;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Shape of log lines written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines for a terminal.
    #[default]
    Pretty,
    /// One JSON object per line, for log shipping.
    Json,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` selects levels and defaults to `info`. Each Moov call is a span, and its close
/// event carries the call's duration.
pub fn init_observability(format: LogFormat) {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    let events = fmt::layer().with_writer(io::stderr).with_span_events(FmtSpan::CLOSE);
    let events = match format {
        LogFormat::Pretty => events.boxed(),
        LogFormat::Json => events.json().with_current_span(true).with_span_list(false).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(events).init();
}
