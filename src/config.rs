use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::RowSource;
use crate::split::partitioner::{
    Group, GroupSplitOptions, IndexPartitioner, TestSize, TrainTestSplit,
};

fn default_test_frac() -> f64 {
    0.2
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Split configuration
// ---------------------------------------------------------------------------

/// Which split to compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SplitMode {
    /// One train/test split of all rows.
    TrainTest {
        #[serde(default = "default_test_frac")]
        test_frac: f64,
        #[serde(default)]
        test_size: Option<usize>,
    },
    /// Rolling groups, each optionally split into train/test.
    Groups {
        number_of_groups: usize,
        #[serde(default)]
        overlap: Option<f64>,
        #[serde(default = "default_true")]
        test_set: bool,
        #[serde(default = "default_test_frac")]
        test_frac: f64,
    },
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::TrainTest {
            test_frac: default_test_frac(),
            test_size: None,
        }
    }
}

/// One split run, usually read from a JSON file:
///
/// ```json
/// {
///   "seed": 42,
///   "index_column": "measurement_id",
///   "mode": { "kind": "groups", "number_of_groups": 5, "overlap": 0.25 }
/// }
/// ```
///
/// Omitted fields take the same defaults as the library API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    pub shuffle: bool,
    pub seed: Option<u64>,
    /// Column whose values identify rows; positional ids when absent.
    pub index_column: Option<String>,
    pub mode: SplitMode,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
            index_column: None,
            mode: SplitMode::default(),
        }
    }
}

/// Result of [`SplitConfig::run`], serialised as the tool's output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SplitOutput<T> {
    TrainTest(TrainTestSplit<T>),
    Groups { groups: Vec<Group<T>> },
}

impl SplitConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing split config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build a partitioner over `source` with this run's shuffle settings.
    pub fn partitioner<S>(&self, source: &S) -> IndexPartitioner<S::Id>
    where
        S: RowSource + ?Sized,
    {
        IndexPartitioner::new(source, self.shuffle, self.seed)
    }

    /// Compute the configured split, collecting every group.
    pub fn run<T: Clone>(&self, partitioner: &IndexPartitioner<T>) -> Result<SplitOutput<T>> {
        let output = match self.mode {
            SplitMode::TrainTest {
                test_frac,
                test_size,
            } => SplitOutput::TrainTest(
                partitioner.train_test_split(TestSize::from_parts(test_frac, test_size))?,
            ),
            SplitMode::Groups {
                number_of_groups,
                overlap,
                test_set,
                test_frac,
            } => {
                let options = GroupSplitOptions {
                    number_of_groups,
                    overlap,
                    test_set,
                    test_frac,
                };
                SplitOutput::Groups {
                    groups: partitioner.group_split(options)?.collect(),
                }
            }
        };
        Ok(output)
    }
}
