use thiserror::Error;
use tracing::Level;
use tracing_log::LogTracer;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to forward log records: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),

    #[error("a global subscriber is already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// JSON lines on stdout. `RUST_LOG` directives, when present, refine `level`.
pub fn setup_logging(level: Level) -> Result<(), LoggingError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_ansi(true)
        .with_line_number(true)
        .with_target(false)
        .finish();

    // teloxide and sqlx emit through `log`
    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
