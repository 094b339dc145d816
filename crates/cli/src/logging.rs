use std::fs::OpenOptions;
use std::path::Path;
use std::sync::OnceLock;

use formist_core::config::types::{LoggingConfig, ResolvedConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber: stderr at `logging.level`, plus a plain
/// file layer when `logging.file` is set. `RUST_LOG` overrides both levels.
pub fn init(cfg: &ResolvedConfig) {
    let logging = &cfg.logging;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(&logging.level, LevelFilter::INFO));

    let file = logging.file.as_deref().map(|path| {
        let writer = open_log_file(path);
        let (writer, guard) = tracing_appender::non_blocking(writer);
        let _ = FILE_GUARD.set(guard);

        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter(file_level(logging), LevelFilter::DEBUG))
    });

    // A second init in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console).with(file).try_init();
}

fn file_level(logging: &LoggingConfig) -> &str {
    logging.file_level.as_deref().unwrap_or(&logging.level)
}

fn env_filter(level: &str, fallback: LevelFilter) -> EnvFilter {
    let level = parse_level(level).unwrap_or(fallback);
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// Logs from successive `formist` runs accumulate in the same file.
fn open_log_file(path: &Path) -> std::fs::File {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path).unwrap_or_else(|e| {
        eprintln!("Failed to open formist log {}: {e}", path.display());
        std::process::exit(1);
    })
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse::<LevelFilter>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("error"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::WARN));
        assert_eq!(parse_level(" Info "), Some(LevelFilter::INFO));
        assert_eq!(parse_level("off"), Some(LevelFilter::OFF));
        assert_eq!(parse_level("loud"), None);
        assert_eq!(parse_level(""), None);
    }

    #[test]
    fn test_file_level_falls_back_to_console_level() {
        let mut logging = LoggingConfig::default();
        assert_eq!(file_level(&logging), "info");
        logging.file_level = Some("trace".into());
        assert_eq!(file_level(&logging), "trace");
    }

    #[test]
    fn test_open_log_file_creates_parent_and_appends() {
        use std::io::Write;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("formist.log");
        writeln!(open_log_file(&path), "first").unwrap();
        writeln!(open_log_file(&path), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
