use chrono::Utc;
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, Registry};

pub fn init_logging(debug: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let log_file = get_log_location();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .unwrap();

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    // Logs go to a file so they never mix with the interactive prompt

    let formatter = BunyanFormattingLayer::new("ournix".into(), non_blocking);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatter);
    tracing::subscriber::set_global_default(subscriber).unwrap();

    guard
}

fn get_log_location() -> PathBuf {
    let base_dirs = BaseDirs::new().unwrap();
    let log_dir = base_dirs.data_dir().join("ournix").join("logs");
    std::fs::create_dir_all(&log_dir).unwrap();
    let timestamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    clean_logfiles(&log_dir);
    log_dir.join(format!("ournix-{}.log", timestamp))
}

fn clean_logfiles(log_dir: &Path) {
    // Logfiles from more than 30 days ago are deleted
    let files = match std::fs::read_dir(log_dir) {
        Ok(files) => files,
        Err(_) => return,
    };
    for file in files.flatten() {
        let modified = file.metadata().and_then(|m| m.modified());
        let modified = match modified {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        let modified: chrono::DateTime<Utc> = chrono::DateTime::from(modified);
        let age = Utc::now().signed_duration_since(modified);
        if age.num_days() > 30 {
            let _ = std::fs::remove_file(file.path());
        }
    }
}
