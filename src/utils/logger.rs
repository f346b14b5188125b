use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes the global tracing subscriber with a timestamped log
/// file under `log_dir`. `RUST_LOG` controls verbosity; the default is
/// `info` so per-row trace output stays off unless asked for.
pub fn init_logger(log_dir: &str) -> Result<()> {
    let dir = Path::new(log_dir);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_file = dir.join(format!("url_insights_{}.log", timestamp));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(fs::File::create(&log_file)?)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Logger initialized, writing to {}", log_file.display());

    Ok(())
}
