//! Errors for setup paths (configuration, mapping files, backend selection).
//!
//! Queries against pads never fail; they degrade to released / `0.0`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A config or mapping file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Snapshot serialization failed.
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested backend is not compiled in for this target.
    #[error("backend `{0}` is not available on this target")]
    BackendUnavailable(String),
}
