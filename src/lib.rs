//! ferry: shape-preserving array transport
//!
//! Named arrays of any shape travel as flat, self-describing tables:
//!
//! ```text
//! client arrays --encode--> table --PUT--> store
//! client <--TABLE-- encode <-- transform <-- decode <--GET-- store
//! ```
//!
//! The workspace splits into:
//! - [`record`]: arrays, tables, and the codec between them
//! - [`net`]: framed TCP transport and the wire protocol
//! - [`server`]: table store, transform dispatch, and the accept loop
//! - [`client`]: caller-facing connection handle

#![warn(missing_docs)]

pub use ferry_client as client;
pub use ferry_net as net;
pub use ferry_record as record;
pub use ferry_server as server;

// Re-exports for convenience
pub use ferry_client::Client;
pub use ferry_record::{codec, ArrayMap, ElementType, NdArray, Record, Scalars, Table};
pub use ferry_server::{Dispatcher, Echo, Server, ServerConfig, TableStore, Transform};
