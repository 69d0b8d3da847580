/// Index partitioning: train/test cuts and rolling group windows.
///
/// Architecture:
/// ```text
///   row ids (RowSource)
///        │  shuffle once (seeded)
///        ▼
///   ┌──────────────────┐
///   │ IndexPartitioner  │  fixed row order
///   └──────────────────┘
///        │                        │
///        ▼                        ▼
///   split_slice             RollingWindows → GroupSplit
///   (prefix / suffix)       (group_length per window)
/// ```

pub mod groups;
pub mod partitioner;
