//! Tracing setup. The terminal belongs to the UI, so logs go to a file.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a JSON subscriber appending to `path`.
///
/// The filter comes from `RUST_LOG` when set, `info` otherwise.
pub fn init(path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("adminboard_tui=info,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(log_path = %path.display(), "Logging initialized");
    Ok(())
}
