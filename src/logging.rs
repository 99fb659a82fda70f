use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "panekit.log";
const DEFAULT_FILTER: &str = "panekit=info";

/// Keeps the non-blocking log writer alive; logs stop flushing once dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Installs a daily-rolling file subscriber under `log_dir`, or the per-user
/// log directory when `None`. Returns `None` if a subscriber is already set
/// or no directory could be created.
pub fn init(log_dir: Option<&Path>) -> Option<LoggingGuard> {
    let log_dir = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok()?;
            dir.to_path_buf()
        }
        None => crate::kernel::services::adapters::ensure_log_dir()
            .or_else(|_| -> std::io::Result<PathBuf> {
                let dir = std::env::temp_dir().join("panekit").join("logs");
                std::fs::create_dir_all(&dir)?;
                Ok(dir)
            })
            .ok()?,
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous(panic_info);
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
