//! Shape-preserving codec between array mappings and tables
//!
//! Encoding flattens each present array into a record holding its row-major
//! scalars and original shape; decoding folds records back into arrays. The
//! pair is lossless: names, shapes, element types, and values all survive
//! the round trip.

use crate::array::{ArrayMap, NdArray};
use crate::table::{Record, Table};
use crate::{Error, Result};

/// Flatten a mapping of named arrays into a table
///
/// Emits one column per present entry; absent entries are dropped. A
/// mapping with no entries at all fails with [`Error::EmptyInput`], while a
/// mapping whose entries are all absent yields a valid zero-column table.
pub fn encode(arrays: &ArrayMap) -> Result<Table> {
    if arrays.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut table = Table::new();
    let mut present = 0usize;
    for (name, array) in arrays.iter() {
        table.insert(
            name,
            Record {
                data: array.data().clone(),
                shape: array.shape().iter().map(|&dim| dim as i64).collect(),
            },
        );
        present += 1;
    }

    // Post-condition: present entries must have produced columns.
    if table.is_empty() && present > 0 {
        return Err(Error::EmptyTable);
    }

    Ok(table)
}

/// Fold a table back into named arrays
///
/// Restores each column's shape and element type exactly. A column whose
/// shape does not describe its element count, including negative or
/// overflowing dimensions, fails with [`Error::ShapeMismatch`]. A
/// zero-column table decodes to an empty mapping.
pub fn decode(table: &Table) -> Result<ArrayMap> {
    let mut arrays = ArrayMap::new();
    for (name, record) in table.iter() {
        arrays.insert(name, reshape(record)?);
    }
    Ok(arrays)
}

/// Rebuild one array from its record
fn reshape(record: &Record) -> Result<NdArray> {
    let mut dims = Vec::with_capacity(record.shape.len());
    for &dim in &record.shape {
        let dim = usize::try_from(dim).map_err(|_| Error::ShapeMismatch {
            shape: record.shape.clone(),
            len: record.data.len(),
        })?;
        dims.push(dim);
    }
    NdArray::new(dims, record.data.clone())
}
