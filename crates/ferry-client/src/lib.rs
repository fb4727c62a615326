//! ferry-client: the caller-facing connection handle
//!
//! A [`Client`] owns its connection: dropping the handle releases the
//! socket on every exit path, and [`Client::close`] shuts it down eagerly.
//! `write` ships arrays up, `get` fetches the computed table raw, and
//! `compute` does both and decodes the answer.

#![warn(missing_docs)]

pub mod client;

/// Client error types
///
/// Server-side failures come back as distinct kinds: a missing command is
/// [`Error::NotFound`] and a failed transform is [`Error::Transform`],
/// never a generic transport error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No table is stored under the requested command
    #[error("No table stored for command {command:?}")]
    NotFound {
        /// The command that was requested
        command: String,
    },

    /// The server-side transform failed
    #[error("Transform failed: {message}")]
    Transform {
        /// Message reported by the server
        message: String,
    },

    /// Encoding or decoding a table failed
    #[error("Codec error: {0}")]
    Codec(#[from] ferry_record::Error),

    /// Network error
    #[error("Network error: {0}")]
    Net(#[from] ferry_net::Error),

    /// The server reported a fault that maps to no specific kind
    #[error("Server fault {code}: {message}")]
    Server {
        /// Wire fault code
        code: u32,
        /// Server-reported message
        message: String,
    },

    /// The server answered with a frame the protocol does not allow here
    #[error("Unexpected frame: expected {expected}")]
    UnexpectedFrame {
        /// What the client was waiting for
        expected: &'static str,
    },
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

pub use client::Client;
