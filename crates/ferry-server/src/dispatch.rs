//! Request dispatch: the transform seam and PUT/GET orchestration

use std::sync::Arc;

use ferry_record::{codec, ArrayMap, Table};

use crate::store::TableStore;
use crate::{BoxError, Error, Result};

/// Server-side computation applied to decoded arrays on every GET
///
/// The transform is injected when the dispatcher is built; a server owns
/// exactly one. Plain functions work too: any `Send + Sync` closure from
/// [`ArrayMap`] to `Result<ArrayMap, BoxError>` is a transform.
pub trait Transform: Send + Sync {
    /// Map the stored arrays to the arrays sent back to the caller
    fn apply(&self, arrays: ArrayMap) -> std::result::Result<ArrayMap, BoxError>;
}

impl<F> Transform for F
where
    F: Fn(ArrayMap) -> std::result::Result<ArrayMap, BoxError> + Send + Sync,
{
    fn apply(&self, arrays: ArrayMap) -> std::result::Result<ArrayMap, BoxError> {
        self(arrays)
    }
}

/// Identity transform: sends stored arrays back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Transform for Echo {
    fn apply(&self, arrays: ArrayMap) -> std::result::Result<ArrayMap, BoxError> {
        Ok(arrays)
    }
}

/// Routes stored tables through the transform
///
/// PUT stores the table exactly as received, with no decode on ingest.
/// GET loads the stored table, decodes it, applies the transform, and
/// re-encodes the result. The whole GET pipeline runs eagerly on the
/// calling thread, and no store lock is held while it runs.
pub struct Dispatcher {
    store: TableStore,
    transform: Arc<dyn Transform>,
}

impl Dispatcher {
    /// Create a dispatcher around the given transform
    pub fn new(transform: impl Transform + 'static) -> Self {
        Self {
            store: TableStore::new(),
            transform: Arc::new(transform),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Store a table under a command
    pub fn put(&self, command: impl Into<String>, table: Table) {
        self.store.put(command, table);
    }

    /// Compute the response table for a command
    ///
    /// Fails with [`Error::NotFound`] when nothing is stored under the
    /// command; decode and encode failures surface as [`Error::Codec`] and
    /// transform failures as [`Error::Transform`], message preserved. A
    /// transform that returns a mapping with no entries fails the request
    /// the same way an empty write would.
    pub fn get(&self, command: &str) -> Result<Table> {
        let stored = self.store.get(command)?;
        tracing::debug!(
            "Computing table for command {:?} ({} columns in)",
            command,
            stored.num_columns()
        );

        let arrays = codec::decode(&stored)?;
        let result = self.transform.apply(arrays).map_err(Error::transform)?;
        Ok(codec::encode(&result)?)
    }
}
