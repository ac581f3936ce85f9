//! Tracing setup: colored stderr output plus a JSON log file rolled daily.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Builds a filter from `spec` (the value of an env var such as `RUST_LOG`),
/// falling back to `default` when the variable is unset or blank.
pub fn filter_from_spec(spec: Option<&str>, default: LevelFilter) -> Result<EnvFilter> {
    match spec.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => Ok(EnvFilter::try_new(spec)?),
        None => Ok(EnvFilter::new(default.to_string())),
    }
}

fn filter_from_env(var: &str, default: LevelFilter) -> Result<EnvFilter> {
    let spec = std::env::var(var).ok();
    filter_from_spec(spec.as_deref(), default)
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// life of the program or buffered file output is lost.
///
/// Stderr stays at `warn` unless `RUST_LOG` says otherwise so that log lines
/// do not interleave with the prompts. The file layer follows
/// `RUST_LOG_JSON`, default `debug`.
pub fn init_tracing(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(filter_from_env("RUST_LOG", LevelFilter::WARN)?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(filter_from_env("RUST_LOG_JSON", LevelFilter::DEBUG)?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
