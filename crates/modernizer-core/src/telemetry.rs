//! Tracing setup for the modernizer binary.
//!
//! Logs go to stderr so that command output on stdout (scan previews, JSON
//! reports) stays clean when piped.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Newline-delimited JSON.
    Json,
}

/// Map a `-v` count to a level: 0 = info, 1 = debug, 2+ = trace.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filter used when `RUST_LOG` is unset. HTTP internals stay at warn so that
/// debug output is about files and stages, not connection pools.
pub fn default_directives(level: Level) -> String {
    format!("{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn", level.as_str().to_lowercase())
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(format: LogFormat, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match format {
        LogFormat::Text => registry.with(layer).try_init().ok(),
        LogFormat::Json => registry.with(layer.json()).try_init().ok(),
    };
}
