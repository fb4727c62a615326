//! Concurrent keyed table storage

use dashmap::DashMap;
use ferry_record::Table;

use crate::{Error, Result};

/// Concurrent map from command to the table most recently stored for it
///
/// Reads and writes both go through the map's shard locks, so a get can
/// never observe a half-written table. Entries live until overwritten.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: DashMap<String, Table>,
}

impl TableStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a table under a command, replacing any previous table
    pub fn put(&self, command: impl Into<String>, table: Table) {
        let command = command.into();
        tracing::debug!(
            "Storing table for command {:?} ({} columns)",
            command,
            table.num_columns()
        );
        self.tables.insert(command, table);
    }

    /// Fetch a copy of the table stored under a command
    ///
    /// The copy means no shard lock is held while the caller works on it.
    pub fn get(&self, command: &str) -> Result<Table> {
        self.tables
            .get(command)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound {
                command: command.to_string(),
            })
    }

    /// True when a table is stored under the command
    #[must_use]
    pub fn contains(&self, command: &str) -> bool {
        self.tables.contains_key(command)
    }

    /// Number of stored commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
