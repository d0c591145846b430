//! Boot — logging init and config load.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::StitchConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries the records.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logstitch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config, apply the positional input argument, and validate.
pub fn boot() -> Result<StitchConfig, Box<dyn std::error::Error>> {
    info!("Starting logstitch v{}", env!("CARGO_PKG_VERSION"));

    let mut config = StitchConfig::load()?;
    if let Some(input) = std::env::args().nth(1) {
        config.input_path = Some(input);
    }
    config.validate()?;

    info!(
        "Loaded configuration: input={}, format={:?}, timing={}",
        config.input_path.as_deref().unwrap_or_default(),
        config.format,
        config.timing
    );

    Ok(config)
}
