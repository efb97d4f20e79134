//! Logging Infrastructure
//!
//! tracing 初始化。指定 LOG_DIR 时输出到按日轮转的日志文件，
//! 目录不存在则自动创建；创建失败时退回控制台输出。

use std::fs;
use std::path::PathBuf;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && let Some(dir) = prepare_log_dir(dir)
    {
        let file_appender = tracing_appender::rolling::daily(dir, "gourmet-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}

/// Create the log directory when missing. `None` when creation fails,
/// in which case logging stays on the console.
fn prepare_log_dir(dir: &str) -> Option<PathBuf> {
    let path = PathBuf::from(dir);
    if let Err(e) = fs::create_dir_all(&path) {
        eprintln!("Failed to create log directory {dir}: {e}");
        return None;
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_missing_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("logs").join("app");
        assert!(!nested.exists());

        let dir = prepare_log_dir(nested.to_str().unwrap()).unwrap();
        assert!(dir.is_dir());

        // Already-existing directory is fine too
        assert!(prepare_log_dir(nested.to_str().unwrap()).is_some());
    }
}
