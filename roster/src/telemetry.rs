//! Tracing subscriber setup.
//!
//! Log verbosity is controlled with the standard `RUST_LOG` environment variable and defaults to
//! `info`. The output format comes from the `log_format` config field:
//!
//! ```yaml
//! log_format: json
//! ```
//!
//! ```bash
//! RUST_LOG=roster=debug,tower_http=debug roster -f config.yaml
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogFormat;

/// Initialize the global tracing subscriber.
///
/// Fails if a global subscriber has already been installed.
pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    info!(?format, "Telemetry initialized");
    Ok(())
}
