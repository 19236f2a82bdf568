use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Returns `Ok(false)` when
/// logging is disabled, and an error if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<bool> {
    if !config.enabled {
        return Ok(false);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(true)
}
