use std::iter::FusedIterator;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::groups::RollingWindows;
use crate::data::model::RowSource;
use crate::error::{Result, SplitError};

// ---------------------------------------------------------------------------
// Split parameters
// ---------------------------------------------------------------------------

/// How many rows go to the test side of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestSize {
    /// Fraction in `[0, 1]`; the test side gets `ceil(len * fraction)` rows.
    Fraction(f64),
    /// Exact number of test rows.
    Count(usize),
}

impl Default for TestSize {
    fn default() -> Self {
        TestSize::Fraction(0.2)
    }
}

impl TestSize {
    /// An explicit `test_size` always wins over `test_frac`.
    pub fn from_parts(test_frac: f64, test_size: Option<usize>) -> Self {
        match test_size {
            Some(count) => TestSize::Count(count),
            None => TestSize::Fraction(test_frac),
        }
    }

    /// Number of test rows for a slice of `len` rows.
    fn resolve(self, len: usize) -> Result<usize> {
        match self {
            TestSize::Fraction(frac) => {
                check_fraction(frac)?;
                Ok(fraction_test_len(len, frac))
            }
            TestSize::Count(count) if count > len => Err(SplitError::invalid_argument(format!(
                "test size {count} exceeds the slice length {len}"
            ))),
            TestSize::Count(count) => Ok(count),
        }
    }
}

fn check_fraction(test_frac: f64) -> Result<()> {
    if (0.0..=1.0).contains(&test_frac) {
        Ok(())
    } else {
        Err(SplitError::invalid_argument(format!(
            "test fraction must lie within [0, 1], got {test_frac}"
        )))
    }
}

fn fraction_test_len(len: usize, test_frac: f64) -> usize {
    ((len as f64 * test_frac).ceil() as usize).min(len)
}

// ---------------------------------------------------------------------------
// Split results
// ---------------------------------------------------------------------------

/// A train/test partition of one slice of row identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrainTestSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

impl<T> TrainTestSplit<T> {
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.train, self.test)
    }

    /// Rows on both sides together.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// One item of a group split: either the window split into train/test or the
/// raw window when no test set was requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Group<T> {
    Split(TrainTestSplit<T>),
    Ids(Vec<T>),
}

impl<T> Group<T> {
    pub fn as_split(&self) -> Option<&TrainTestSplit<T>> {
        match self {
            Group::Split(split) => Some(split),
            Group::Ids(_) => None,
        }
    }

    pub fn as_ids(&self) -> Option<&[T]> {
        match self {
            Group::Split(_) => None,
            Group::Ids(ids) => Some(ids),
        }
    }

    /// Rows covered by the window.
    pub fn len(&self) -> usize {
        match self {
            Group::Split(split) => split.len(),
            Group::Ids(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `ids` into a prefix (train) and suffix (test).
///
/// This is a deterministic cut, not a random assignment: any randomness comes
/// from shuffling the order beforehand.
pub fn split_slice<T: Clone>(ids: &[T], test_size: TestSize) -> Result<TrainTestSplit<T>> {
    let test_len = test_size.resolve(ids.len())?;
    Ok(cut(ids, test_len))
}

fn cut<T: Clone>(ids: &[T], test_len: usize) -> TrainTestSplit<T> {
    let (train, test) = ids.split_at(ids.len() - test_len);
    TrainTestSplit {
        train: train.to_vec(),
        test: test.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Group split request
// ---------------------------------------------------------------------------

/// Parameters of [`IndexPartitioner::group_split`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSplitOptions {
    pub number_of_groups: usize,
    /// Fraction in `[0, 1]`; `None` behaves like `0`.
    pub overlap: Option<f64>,
    /// Split every window into train/test when set, else yield raw windows.
    pub test_set: bool,
    pub test_frac: f64,
}

impl GroupSplitOptions {
    pub fn new(number_of_groups: usize) -> Self {
        Self {
            number_of_groups,
            overlap: None,
            test_set: true,
            test_frac: 0.2,
        }
    }

    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = Some(overlap);
        self
    }

    pub fn with_test_set(mut self, test_set: bool) -> Self {
        self.test_set = test_set;
        self
    }

    pub fn with_test_frac(mut self, test_frac: f64) -> Self {
        self.test_frac = test_frac;
        self
    }
}

// ---------------------------------------------------------------------------
// IndexPartitioner
// ---------------------------------------------------------------------------

/// Holds the (optionally shuffled) row order and slices it on request.
///
/// The order is fixed at construction; every query afterwards is a pure read,
/// so repeating a call with the same parameters returns the same rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPartitioner<T> {
    index: Vec<T>,
    shuffled: bool,
}

impl<T: Clone> IndexPartitioner<T> {
    /// Read the row order from `source`, shuffling it when `shuffle` is set.
    ///
    /// A seed gives a reproducible permutation; without one the generator is
    /// seeded from system entropy.
    pub fn new<S>(source: &S, shuffle: bool, seed: Option<u64>) -> Self
    where
        S: RowSource<Id = T> + ?Sized,
    {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(source, shuffle, &mut rng)
    }

    /// Like [`IndexPartitioner::new`] but shuffles with a caller-owned generator.
    pub fn with_rng<S, R>(source: &S, shuffle: bool, rng: &mut R) -> Self
    where
        S: RowSource<Id = T> + ?Sized,
        R: Rng + ?Sized,
    {
        let mut index = source.row_ids();
        let row_count = source.row_count();
        if index.len() != row_count {
            log::warn!(
                "row source reports {row_count} rows but supplied {} identifiers; using the identifiers",
                index.len()
            );
        }

        if shuffle {
            index.shuffle(rng);
        }
        log::debug!("partitioner over {} rows (shuffled: {shuffle})", index.len());

        Self {
            index,
            shuffled: shuffle,
        }
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// The stored row order.
    pub fn index(&self) -> &[T] {
        &self.index
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Split the whole row order into train/test.
    ///
    /// An explicit [`TestSize::Count`] must be strictly smaller than
    /// [`size`](Self::size).
    pub fn train_test_split(&self, test_size: TestSize) -> Result<TrainTestSplit<T>> {
        if let TestSize::Count(count) = test_size {
            if count >= self.size() {
                return Err(SplitError::invalid_argument(format!(
                    "the test size must be smaller than the size of the data; \
                     currently test_size: {count} and data_size: {}",
                    self.size()
                )));
            }
        }
        split_slice(&self.index, test_size)
    }

    /// Cut the row order into `number_of_groups` rolling windows.
    ///
    /// All arguments are checked up front; on success the returned iterator
    /// yields exactly `number_of_groups` items.
    pub fn group_split(&self, options: GroupSplitOptions) -> Result<GroupSplit<'_, T>> {
        let windows = RollingWindows::new(self.size(), options.number_of_groups, options.overlap)?;
        if options.test_set {
            check_fraction(options.test_frac)?;
        }
        log::debug!(
            "group split over {} rows: {} groups, overlap {}, test set: {}",
            self.size(),
            options.number_of_groups,
            windows.overlap(),
            options.test_set
        );

        Ok(GroupSplit {
            index: &self.index,
            windows,
            test_set: options.test_set,
            test_frac: options.test_frac,
        })
    }
}

// ---------------------------------------------------------------------------
// GroupSplit – lazy sequence of groups
// ---------------------------------------------------------------------------

/// Lazy, finite sequence of [`Group`]s produced by
/// [`IndexPartitioner::group_split`].
///
/// A single instance is forward-only; calling `group_split` again with the
/// same options starts an identical sequence.
#[derive(Debug, Clone)]
pub struct GroupSplit<'a, T> {
    index: &'a [T],
    windows: RollingWindows,
    test_set: bool,
    test_frac: f64,
}

impl<T: Clone> Iterator for GroupSplit<'_, T> {
    type Item = Group<T>;

    fn next(&mut self) -> Option<Group<T>> {
        let window = self.windows.next()?;
        let ids = &self.index[window.range()];
        let group = if self.test_set {
            Group::Split(cut(ids, fraction_test_len(ids.len(), self.test_frac)))
        } else {
            Group::Ids(ids.to_vec())
        };
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for GroupSplit<'_, T> {}

impl<T: Clone> FusedIterator for GroupSplit<'_, T> {}
