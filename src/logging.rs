use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging: a console layer always, plus a plain-text file layer
/// under the per-user logs directory when `--verbose` is requested.
///
/// The returned guard must stay alive until the process exits, otherwise the
/// non-blocking file writer thread terminates early.
pub fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let console_layer = fmt::layer().with_target(false);

    if verbose
        && let Some(dir) = crate::util::app_logs_dir()
        && std::fs::create_dir_all(&dir).is_ok()
    {
        let appender = tracing_appender::rolling::never(&dir, "clift.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
        tracing_subscriber::registry().with(env_filter).with(console_layer).with(file_layer).init();
        return Some(guard);
    }

    tracing_subscriber::registry().with(env_filter).with(console_layer).init();
    None
}
