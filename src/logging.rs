use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Directory that holds photoportal.log
fn log_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(|| dirs::home_dir())
        .expect("Could not determine user data directory");

    path.push("photo-portal");
    path
}

/// Initialize logging to photoportal.log in the app data directory.
///
/// The returned guard must stay alive for the duration of the program;
/// dropping it stops the background log writer.
pub fn init() -> WorkerGuard {
    let dir = log_dir();
    std::fs::create_dir_all(&dir).expect("Failed to create application data directory");

    let file_appender = tracing_appender::rolling::never(&dir, "photoportal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false) // No ANSI colors in log files
        .init();

    tracing::info!("Logging initialized to {}", dir.display());

    guard
}
