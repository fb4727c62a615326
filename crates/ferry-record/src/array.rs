//! Array types: element tags, flat scalar buffers, shaped arrays

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Array element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    Text,
}

impl ElementType {
    /// Get the name of the element type
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int64" | "i64" => Ok(Self::Int64),
            "float64" | "f64" => Ok(Self::Float64),
            "text" | "str" => Ok(Self::Text),
            _ => Err(format!("Unknown element type: {s}")),
        }
    }
}

/// Flat, homogeneously-typed buffer of scalars
///
/// This is the `data` half of a wire record. Values appear in row-major
/// order, first axis varying slowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalars {
    /// 64-bit signed integers
    Int64(Vec<i64>),
    /// 64-bit floats
    Float64(Vec<f64>),
    /// UTF-8 strings
    Text(Vec<String>),
}

impl Scalars {
    /// Number of scalars in the buffer
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// True when the buffer holds no scalars
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the buffer
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Int64(_) => ElementType::Int64,
            Self::Float64(_) => ElementType::Float64,
            Self::Text(_) => ElementType::Text,
        }
    }
}

impl From<Vec<i64>> for Scalars {
    fn from(values: Vec<i64>) -> Self {
        Self::Int64(values)
    }
}

impl From<Vec<f64>> for Scalars {
    fn from(values: Vec<f64>) -> Self {
        Self::Float64(values)
    }
}

impl From<Vec<String>> for Scalars {
    fn from(values: Vec<String>) -> Self {
        Self::Text(values)
    }
}

/// An owned n-dimensional array: row-major scalars plus their shape
///
/// The element count always equals the product of the dimensions. A
/// zero-dimensional shape describes a scalar holding exactly one element,
/// and any shape with a zero dimension describes an empty array.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data: Scalars,
}

impl NdArray {
    /// Create an array from a shape and flat row-major data
    ///
    /// Fails with [`Error::ShapeMismatch`] when the dimensions do not
    /// describe exactly `data.len()` elements.
    pub fn new(shape: Vec<usize>, data: impl Into<Scalars>) -> Result<Self> {
        let data = data.into();
        match numel(&shape) {
            Some(expected) if expected == data.len() => Ok(Self { shape, data }),
            _ => Err(Error::ShapeMismatch {
                shape: shape.iter().map(|&d| d as i64).collect(),
                len: data.len(),
            }),
        }
    }

    /// Zero-dimensional integer array
    #[must_use]
    pub fn scalar_i64(value: i64) -> Self {
        Self {
            shape: Vec::new(),
            data: Scalars::Int64(vec![value]),
        }
    }

    /// Zero-dimensional float array
    #[must_use]
    pub fn scalar_f64(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: Scalars::Float64(vec![value]),
        }
    }

    /// Zero-dimensional text array
    #[must_use]
    pub fn scalar_text(value: impl Into<String>) -> Self {
        Self {
            shape: Vec::new(),
            data: Scalars::Text(vec![value.into()]),
        }
    }

    /// One-dimensional integer array
    #[must_use]
    pub fn vector_i64(values: Vec<i64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: Scalars::Int64(values),
        }
    }

    /// One-dimensional float array
    #[must_use]
    pub fn vector_f64(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: Scalars::Float64(values),
        }
    }

    /// One-dimensional text array
    #[must_use]
    pub fn vector_text(values: Vec<String>) -> Self {
        Self {
            shape: vec![values.len()],
            data: Scalars::Text(values),
        }
    }

    /// Dimensions, outermost first
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major scalars
    #[must_use]
    pub fn data(&self) -> &Scalars {
        &self.data
    }

    /// Element type of the array
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Total element count
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the array holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of dimensions
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// Element count described by a shape, `None` on overflow
///
/// The empty shape multiplies out to 1: a scalar.
fn numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Named arrays travelling together as one unit
///
/// Entries may be present or absent. Absent entries are legal members that
/// the codec silently drops when building a table; they still count toward
/// the entry total, so a mapping of nothing but absent entries is not
/// empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayMap {
    entries: HashMap<String, Option<NdArray>>,
}

impl ArrayMap {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an array under a name, replacing any previous entry
    pub fn insert(&mut self, name: impl Into<String>, array: NdArray) {
        self.entries.insert(name.into(), Some(array));
    }

    /// Insert an entry that may be absent
    pub fn insert_opt(&mut self, name: impl Into<String>, array: Option<NdArray>) {
        self.entries.insert(name.into(), array);
    }

    /// Look up a present array by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NdArray> {
        self.entries.get(name).and_then(|entry| entry.as_ref())
    }

    /// True when an entry exists under the name, present or absent
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Total entry count, absent entries included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the mapping has no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the present entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NdArray)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| entry.as_ref().map(|array| (name.as_str(), array)))
    }

    /// Names of the present entries
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }
}

impl FromIterator<(String, NdArray)> for ArrayMap {
    fn from_iter<I: IntoIterator<Item = (String, NdArray)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<(String, NdArray)> for ArrayMap {
    fn extend<I: IntoIterator<Item = (String, NdArray)>>(&mut self, iter: I) {
        for (name, array) in iter {
            self.insert(name, array);
        }
    }
}
