//! Server error types

/// Boxed error returned by transforms
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No table is stored under the requested command
    #[error("No table stored for command {command:?}")]
    NotFound {
        /// The command that was requested
        command: String,
    },

    /// Encoding or decoding a table failed
    #[error("Codec error: {0}")]
    Codec(#[from] ferry_record::Error),

    /// The injected transform rejected the arrays
    #[error("Transform failed: {message}")]
    Transform {
        /// Message reported by the transform
        message: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// Network error
    #[error("Network error: {0}")]
    Net(#[from] ferry_net::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a transform failure, preserving its message and source
    pub fn transform(source: BoxError) -> Self {
        Self::Transform {
            message: source.to_string(),
            source,
        }
    }
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, Error>;
