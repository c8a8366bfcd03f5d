use chrono::Local;
use std::backtrace::Backtrace;
use std::env;
use std::fs::OpenOptions;
use std::panic;
use std::sync::{Mutex, Once};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "blockchain_pimp_bot.log";

static PANIC_HOOK: Once = Once::new();

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// `LOG_FILE` or the default. Resolved before config so startup failures
/// are logged too.
pub fn log_file_path() -> String {
    log_file_from(|key| env::var(key).ok())
}

fn log_file_from<F: Fn(&str) -> Option<String>>(lookup: F) -> String {
    lookup("LOG_FILE")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}

/// Logs to stdout and appends the same lines to `path`.
/// Level defaults to `info`, overridable with `RUST_LOG`.
pub fn init(path: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(LocalTimer))
        .with(
            fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;

    install_panic_hook();
    tracing::info!("Logging setup complete.");
    Ok(())
}

/// Routes panics, with location and a captured backtrace, through `tracing`
/// so they reach the log file. The previous hook still runs afterwards.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string());
            let payload = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());

            tracing::error!(
                "panicked at {}: {}\nbacktrace:\n{}",
                location,
                payload,
                Backtrace::force_capture()
            );
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    #[test]
    fn test_log_file_path_defaults() {
        assert_eq!(log_file_from(|_| None), "blockchain_pimp_bot.log");
        assert_eq!(log_file_from(|_| Some(" ".to_string())), "blockchain_pimp_bot.log");
        assert_eq!(
            log_file_from(|k| (k == "LOG_FILE").then(|| "bot.log".to_string())),
            "bot.log"
        );
    }

    #[test]
    fn test_panics_are_logged_with_location_and_backtrace() {
        install_panic_hook();
        let (_guard, logs) = capture_logs();

        let result = panic::catch_unwind(|| panic!("vault door jammed"));
        assert!(result.is_err());

        let output = logs.contents();
        assert!(output.contains("panicked at src/logging.rs:"), "{output}");
        assert!(output.contains("vault door jammed"));
        assert!(output.contains("backtrace:"));
    }
}
