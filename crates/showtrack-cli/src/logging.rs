use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use showtrack_core::config::{AppConfig, LoggingConfig};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over everything. Otherwise `-v` raises the level to
/// debug, then trace, and without it `[logging].level` applies. With
/// `[logging].file` set, output goes to a daily rolling file instead of
/// stderr; the returned guard must live until exit so buffered lines flush.
pub fn init(config: &LoggingConfig, verbose: u8) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("showtrack={level}")));

    let registry = Registry::default().with(filter);

    if config.file {
        let log_dir = AppConfig::log_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("cannot create log directory {}: {e}", log_dir.display());
        } else {
            // Files are named showtrack.log.YYYY-MM-DD.
            let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "showtrack.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            return Some(guard);
        }
    }

    registry
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
    None
}
