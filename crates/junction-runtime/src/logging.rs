//! Tracing subscriber setup
//!
//! Library crates only emit `tracing` events. Binaries call
//! [`init_tracing`] once; `RUST_LOG` overrides the default directive.

use tracing_subscriber::{fmt, EnvFilter};

use crate::{RuntimeError, RuntimeResult};

/// Output format for log lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    /// One JSON object per line
    Json,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_directive: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Full,
            default_directive: "info".into(),
        }
    }
}

impl LogConfig {
    /// Per-tick debug output from the scheduler
    pub fn verbose() -> Self {
        LogConfig {
            format: LogFormat::Compact,
            default_directive: "info,junction_scheduler=debug".into(),
        }
    }
}

/// Install the global subscriber
pub fn init_tracing(config: &LogConfig) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));
    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|_| RuntimeError::LoggingInitialized)
}
