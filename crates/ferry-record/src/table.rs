//! Wire containers: records and tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::array::Scalars;

/// One encoded column: flat data plus the shape it folds back into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Flat row-major scalars
    pub data: Scalars,
    /// Original dimensions, outermost first
    pub shape: Vec<i64>,
}

/// Self-describing flat container: one record per named array
///
/// This is the unit that travels over the wire and the unit the server
/// retains. It carries everything needed to rebuild the arrays it was
/// encoded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: HashMap<String, Record>,
}

impl Table {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column
    pub fn insert(&mut self, name: impl Into<String>, record: Record) {
        self.columns.insert(name.into(), record);
    }

    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Record> {
        self.columns.get(name)
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names, in arbitrary order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate over the columns
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.columns.iter().map(|(name, record)| (name.as_str(), record))
    }
}
