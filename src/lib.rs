//! Reproducible train/test and rolling group splits over row identifiers.
//!
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  data     │  load file → Table (row ids)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ IndexPartitioner  │  shuffle once, then slice
//!   └──────────────────┘
//!        │                    │
//!        ▼                    ▼
//!   train_test_split      group_split → GroupSplit (lazy windows)
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod split;

pub use data::model::{CellValue, Row, RowSource, Table};
pub use error::SplitError;
pub use split::groups::{group_length, RollingWindows, Window};
pub use split::partitioner::{
    split_slice, Group, GroupSplit, GroupSplitOptions, IndexPartitioner, TestSize, TrainTestSplit,
};
