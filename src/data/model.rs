use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Result};
use serde::Serialize;

// ---------------------------------------------------------------------------
// RowSource – anything that can hand out an ordered list of row ids
// ---------------------------------------------------------------------------

/// A tabular collaborator exposing its row count and row identifiers.
///
/// Both are read once when an [`IndexPartitioner`](crate::IndexPartitioner)
/// is built.
pub trait RowSource {
    type Id: Clone;

    fn row_count(&self) -> usize;

    /// Row identifiers in source order.
    fn row_ids(&self) -> Vec<Self::Id>;
}

impl<T: Clone> RowSource for [T] {
    type Id = T;

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_ids(&self) -> Vec<T> {
        self.to_vec()
    }
}

impl<T: Clone> RowSource for Vec<T> {
    type Id = T;

    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_ids(&self) -> Vec<T> {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common data-frame dtypes.
///
/// Cells double as row identifiers, so they must be `Ord` and `Hash`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date or timestamp kept as its textual form.
    Date(String),
    Null,
}

// -- Manual Eq/Ord/Hash: floats compare by total order --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) | CellValue::Date(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded data set
// ---------------------------------------------------------------------------

/// One row: column name → cell.
pub type Row = BTreeMap<String, CellValue>;

/// A loaded table with an optional index column.
///
/// Without an index column the row ids are the positional row numbers,
/// like a default data-frame index.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Rows in file order.
    pub rows: Vec<Row>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    index_column: Option<String>,
}

impl Table {
    pub fn new(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        Table {
            rows,
            column_names,
            index_column: None,
        }
    }

    /// Use the values of `column` as row identifiers.
    pub fn with_index_column(mut self, column: &str) -> Result<Self> {
        if !self.column_names.iter().any(|c| c == column) {
            bail!(
                "unknown index column '{column}'; available columns: {:?}",
                self.column_names
            );
        }
        self.index_column = Some(column.to_string());
        Ok(self)
    }

    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for Table {
    type Id = CellValue;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_ids(&self) -> Vec<CellValue> {
        match &self.index_column {
            Some(column) => self
                .rows
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or(CellValue::Null))
                .collect(),
            None => (0..self.rows.len())
                .map(|i| CellValue::Integer(i as i64))
                .collect(),
        }
    }
}
