//! Error types for the tower-defense configuration tool.

use camino::Utf8PathBuf;
use poly_config::{PolyError, SetupError};
use thiserror::Error;

/// Errors raised by the tower-defense configuration tool.
#[derive(Debug, Error)]
pub enum TowerError {
    /// Loading or reloading the configuration failed.
    #[error(transparent)]
    Config(#[from] PolyError),
    /// The configuration schema is inconsistent.
    #[error("invalid configuration schema: {0}")]
    Schema(#[from] SetupError),
    /// The bundled default configuration could not be installed.
    #[error("failed to install default configuration at '{path}': {source}")]
    Bootstrap {
        /// Target file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading commands or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A snapshot could not be rendered.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),
}

/// Convenience alias for results in this crate.
pub type Result<T, E = TowerError> = std::result::Result<T, E>;
