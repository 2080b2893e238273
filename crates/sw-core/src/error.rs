//! Unified error type for streamwise.
//!
//! Library crates funnel their failures into [`Error`]. The decision path
//! itself is total; errors only surface from capability probing (where the
//! resolver absorbs them), preset validation and configuration loading.

/// Unified error type covering all failure modes in streamwise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A device capability probe failed.
    #[error("Probe error [{device_id}]: {message}")]
    Probe {
        /// Device whose capabilities were being probed.
        device_id: String,
        /// Human-readable error description.
        message: String,
    },

    /// A device capability probe did not finish in time.
    #[error("Probe of device {device_id} timed out after {after_ms} ms")]
    Timeout {
        /// Device whose capabilities were being probed.
        device_id: String,
        /// The timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Probe {
            device_id: device_id.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
