//! CLI error types.

use std::path::PathBuf;

use reflector_config::ConfigError;
use reflector_core::WriteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Write(#[from] WriteError),
}
