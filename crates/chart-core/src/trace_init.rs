//! Opt-in JSON tracing for decoder runs.
//!
//! With the `trace` feature on, events at `debug` and above from this crate
//! go to `chart-core-trace.jsonl` in the chosen directory. Without it no
//! subscriber is installed and [`init_tracing`] returns `Ok(None)`.

use std::io;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "chart-core-trace.jsonl";

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> io::Result<Option<PathBuf>> {
    use std::sync::OnceLock;

    // First caller picks the directory; later calls report where it went.
    static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
    if let Some(path) = LOG_PATH.get() {
        return Ok(Some(path.clone()));
    }
    std::fs::create_dir_all(log_dir)?;
    let path = LOG_PATH.get_or_init(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Workers log until process exit.
        std::mem::forget(guard);

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chart_core=debug"));
        // A subscriber installed elsewhere wins; ours is then unused.
        let _ = tracing_subscriber::fmt()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(filter)
            .try_init();
        log_dir.join(LOG_FILE_NAME)
    });
    Ok(Some(path.clone()))
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &Path) -> io::Result<Option<PathBuf>> {
    Ok(None)
}
