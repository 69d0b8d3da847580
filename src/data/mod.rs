/// Data layer: tables and loading.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  rows, column names, optional index column
///   └──────────┘
///        │
///        ▼
///   RowSource::row_ids → IndexPartitioner
/// ```

pub mod loader;
pub mod model;
