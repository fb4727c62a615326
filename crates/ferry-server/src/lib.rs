//! ferry-server: keyed table storage behind an injected transform
//!
//! A server owns exactly one [`Transform`], chosen when it is built. PUT
//! stores tables verbatim under a command; GET replays the stored table
//! through decode, transform, encode and ships the result back. Every GET
//! recomputes; nothing is cached.

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod serve;
pub mod store;

pub use config::ServerConfig;
pub use dispatch::{Dispatcher, Echo, Transform};
pub use error::{BoxError, Error, Result};
pub use serve::Server;
pub use store::TableStore;
