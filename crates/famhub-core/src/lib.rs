pub mod config;
pub mod error;
pub mod submit_state;

pub use config::{BackendConfig, BackendKind, BoardConfig, CalendarConfig, Config, ValidationResult};
pub use error::{AppError, DatabaseError, NetworkError, ValidationError};
pub use submit_state::SubmitState;

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("FamHub core initialized");
    Ok(())
}
