//! ferry-net: framed wire protocol over TCP
//!
//! Length-prefixed binary frames carry tables between client and server:
//! - PUT stores an encoded table under a command, answered by PUT_OK
//! - GET asks for the computed table for a command, answered by TABLE
//! - ERROR carries a fault code the peer can map back to an error kind

#![warn(missing_docs)]

pub mod codec;
pub mod frames;
pub mod transport;

/// Errors raised by the transport and the frame codec
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure establishing or using a connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Bytes on the wire that violate the framing rules
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Socket-level failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, Error>;

pub use codec::Frame;
pub use frames::{fault, frame_type, FrameHeader};
pub use transport::{Connection, Listener};
