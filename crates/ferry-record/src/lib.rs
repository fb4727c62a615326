//! ferry-record: array data model and shape-preserving codec
//!
//! Named n-dimensional arrays flatten into self-describing tables:
//! - one column per array, named after it
//! - each column carries the row-major scalars plus the original shape
//! - decoding restores shape and element type exactly

#![warn(missing_docs)]

pub mod array;
pub mod codec;
pub mod table;

/// Record error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encoding was handed a mapping with no entries
    #[error("Input mapping has no entries")]
    EmptyInput,

    /// A table that should carry columns came out empty
    #[error("Encoded table is empty despite non-empty input")]
    EmptyTable,

    /// Shape and element count disagree
    #[error("Shape {shape:?} does not describe {len} elements")]
    ShapeMismatch {
        /// Offending shape, dimensions outermost first
        shape: Vec<i64>,
        /// Actual element count
        len: usize,
    },
}

/// Result type for record operations
pub type Result<T> = std::result::Result<T, Error>;

pub use array::{ArrayMap, ElementType, NdArray, Scalars};
pub use codec::{decode, encode};
pub use table::{Record, Table};
