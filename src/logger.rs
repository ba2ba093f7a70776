use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, failing if one is already set.
///
/// `RUST_LOG` selects the filter (default `info`). At debug level span close
/// events are logged too, which gives per-stage timings for free.
pub fn try_init() -> Result<(), TryInitError> {
    let filter = env_filter();
    let span_events = if filter.to_string().contains("debug") || filter.to_string().contains("trace")
    {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}

/// Like [`try_init`], ignoring an already installed subscriber.
pub fn init() {
    let _ = try_init();
}
