//! Tracing subscriber setup.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LEVELS: [LevelFilter; 5] = [
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
    LevelFilter::TRACE,
];

/// Raises `base` by one level per `-v`, saturating at `TRACE`.
pub fn level_for(base: LevelFilter, verbose: u8) -> LevelFilter {
    let start = LEVELS.iter().position(|l| *l == base).unwrap_or(0);
    let index = (start + usize::from(verbose)).min(LEVELS.len() - 1);
    LEVELS[index]
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(base: LevelFilter, verbose: u8) -> String {
    let level = level_for(base, verbose);
    format!("{}={level},tower_http={level}", env!("CARGO_CRATE_NAME"))
}

/// Whether events also go to stderr. Without a log file they always do.
pub fn writes_stderr(log_file: Option<&Path>, keep_stderr: bool) -> bool {
    log_file.is_none() || keep_stderr
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `base` and `verbose`. With `log_file`, plain-text logs
/// are appended to that file, and stderr keeps receiving them only when
/// `keep_stderr` is set (the relay logs to both).
pub fn init(
    base: LevelFilter,
    verbose: u8,
    log_file: Option<&Path>,
    keep_stderr: bool,
) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(base, verbose)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = writes_stderr(log_file, keep_stderr)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(LevelFilter::ERROR, 0), LevelFilter::ERROR);
        assert_eq!(level_for(LevelFilter::ERROR, 2), LevelFilter::INFO);
        assert_eq!(level_for(LevelFilter::INFO, 1), LevelFilter::DEBUG);
        assert_eq!(level_for(LevelFilter::INFO, 9), LevelFilter::TRACE);
    }

    #[test]
    fn test_writes_stderr() {
        let file = Path::new("charla.log");
        assert!(writes_stderr(None, false));
        assert!(writes_stderr(None, true));
        assert!(!writes_stderr(Some(file), false));
        assert!(writes_stderr(Some(file), true));
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive(LevelFilter::INFO, 0).to_lowercase(),
            "charla=info,tower_http=info"
        );
    }
}
