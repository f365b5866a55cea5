use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One short line per event, for a terminal watching a run.
    Compact,
    /// JSON lines, for runs whose logs are shipped somewhere else.
    Json,
}

/// Filter used when `RUST_LOG` is unset. Shipped JSON logs keep the HTTP
/// stack at warn so per-request chatter doesn't drown the per-lender lines.
fn default_directives(verbose: bool, format: LogFormat) -> &'static str {
    match (format, verbose) {
        (LogFormat::Compact, false) => "lender_enrich=info",
        (LogFormat::Compact, true) => "lender_enrich=debug,info",
        (LogFormat::Json, false) => "lender_enrich=info,reqwest=warn,hyper=warn,warn",
        (LogFormat::Json, true) => "lender_enrich=debug,reqwest=info,hyper=warn,info",
    }
}

fn env_filter(verbose: bool, format: LogFormat) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, format)))
}

pub fn init_logger(verbose: bool, format: LogFormat) {
    let filter = env_filter(verbose, format);
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().flatten_event(true).with_current_span(false))
            .init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(verbose, LogFormat::Compact);
}

pub fn init_json_logger(verbose: bool) {
    init_logger(verbose, LogFormat::Json);
}
