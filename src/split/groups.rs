use std::iter::FusedIterator;
use std::ops::Range;

use crate::error::{Result, SplitError};

// ---------------------------------------------------------------------------
// Group lengths
// ---------------------------------------------------------------------------

/// Number of rows assigned to group `group_index` when `size` rows are cut
/// into `number_of_groups` groups.
///
/// The remainder of `size / number_of_groups` is handed out one row at a time
/// to the earliest groups, so the lengths always sum to `size`:
///
/// ```
/// use group_split::group_length;
///
/// let lengths: Vec<usize> = (0..3).map(|g| group_length(g, 10, 3)).collect();
/// assert_eq!(lengths, vec![4, 3, 3]);
/// ```
pub fn group_length(group_index: usize, size: usize, number_of_groups: usize) -> usize {
    debug_assert!(number_of_groups > 0, "number_of_groups must be positive");
    let base = size / number_of_groups;
    if group_index < size % number_of_groups {
        base + 1
    } else {
        base
    }
}

// ---------------------------------------------------------------------------
// Window – one contiguous slice of the index order
// ---------------------------------------------------------------------------

/// Half-open offset range `[start, end)` into the stored index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Offset of the last row covered by the window, if any.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// ---------------------------------------------------------------------------
// Argument checks shared by the window generator
// ---------------------------------------------------------------------------

/// Validate a group request and resolve the overlap fraction (absent → 0).
pub(crate) fn check_group_request(
    size: usize,
    number_of_groups: usize,
    overlap: Option<f64>,
) -> Result<f64> {
    if number_of_groups < 2 {
        return Err(SplitError::invalid_argument(format!(
            "number of groups to split the data must be at least 2, got {number_of_groups}"
        )));
    }
    if number_of_groups > size {
        return Err(SplitError::invalid_argument(format!(
            "number of groups too large: {number_of_groups}; \
             it must not exceed the size of the data: {size}"
        )));
    }

    let overlap = overlap.unwrap_or(0.0);
    if overlap > 1.0 {
        return Err(SplitError::invalid_argument(format!(
            "overlap cannot be larger than 1, got {overlap}; permitted values: None or [0, 1]"
        )));
    }
    if overlap.is_nan() || overlap < 0.0 {
        return Err(SplitError::invalid_argument(format!(
            "overlap must lie within [0, 1], got {overlap}"
        )));
    }
    Ok(overlap)
}

// ---------------------------------------------------------------------------
// RollingWindows – lazy window generator
// ---------------------------------------------------------------------------

/// Lazy sequence of group windows over `size` rows.
///
/// A cumulative `end` cursor advances by each group's length. After a window
/// is emitted the next start is `end - overlap * end`, i.e. the overlap is a
/// fraction of the cumulative end offset rather than of the window length.
/// With no overlap the windows tile `0..size` exactly.
#[derive(Debug, Clone)]
pub struct RollingWindows {
    size: usize,
    number_of_groups: usize,
    overlap: f64,
    next_group: usize,
    start: f64,
    end: usize,
}

impl RollingWindows {
    /// Build the generator, failing before any window is produced when the
    /// request is invalid.
    pub fn new(size: usize, number_of_groups: usize, overlap: Option<f64>) -> Result<Self> {
        let overlap = check_group_request(size, number_of_groups, overlap)?;
        Ok(Self {
            size,
            number_of_groups,
            overlap,
            next_group: 0,
            start: 0.0,
            end: 0,
        })
    }

    pub fn number_of_groups(&self) -> usize {
        self.number_of_groups
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }
}

impl Iterator for RollingWindows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next_group >= self.number_of_groups {
            return None;
        }

        self.end += group_length(self.next_group, self.size, self.number_of_groups);
        let window = Window {
            start: (self.start.floor() as usize).min(self.end),
            end: self.end,
        };
        log::trace!(
            "group {}: window [{}, {})",
            self.next_group,
            window.start,
            window.end
        );

        let end = self.end as f64;
        self.start = end - self.overlap * end;
        self.next_group += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.number_of_groups - self.next_group;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RollingWindows {}

impl FusedIterator for RollingWindows {}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn windows(size: usize, groups: usize, overlap: Option<f64>) -> Vec<Window> {
        RollingWindows::new(size, groups, overlap)
            .expect("request should be valid")
            .collect()
    }

    #[test]
    fn remainder_goes_to_earliest_groups() {
        let lengths: Vec<usize> = (0..4).map(|g| group_length(g, 10, 4)).collect();
        assert_eq!(lengths, vec![3, 3, 2, 2]);
    }

    #[test]
    fn group_lengths_sum_to_size() {
        for size in 2..40 {
            for groups in 2..=size {
                let total: usize = (0..groups).map(|g| group_length(g, size, groups)).sum();
                assert_eq!(total, size, "size={size}, groups={groups}");
            }
        }
    }

    #[test]
    fn windows_tile_without_overlap() {
        let got = windows(10, 3, None);
        assert_eq!(
            got,
            vec![
                Window { start: 0, end: 4 },
                Window { start: 4, end: 7 },
                Window { start: 7, end: 10 },
            ]
        );
        assert_eq!(got[0].last(), Some(3));
        assert_eq!(got[2].last(), Some(9));
    }

    #[test]
    fn zero_overlap_matches_absent_overlap() {
        assert_eq!(windows(17, 5, Some(0.0)), windows(17, 5, None));
    }

    #[test]
    fn overlap_is_fraction_of_cumulative_end() {
        // end=5 → next start 2.5 → floored to 2
        assert_eq!(
            windows(10, 2, Some(0.5)),
            vec![Window { start: 0, end: 5 }, Window { start: 2, end: 10 }]
        );
        // later windows reach further back as the cumulative end grows
        assert_eq!(
            windows(12, 3, Some(0.25)),
            vec![
                Window { start: 0, end: 4 },
                Window { start: 3, end: 8 },
                Window { start: 6, end: 12 },
            ]
        );
    }

    #[test]
    fn full_overlap_anchors_every_window_at_zero() {
        let got = windows(9, 3, Some(1.0));
        assert_eq!(
            got,
            vec![
                Window { start: 0, end: 3 },
                Window { start: 0, end: 6 },
                Window { start: 0, end: 9 },
            ]
        );
    }

    #[test]
    fn iterator_reports_exact_length() {
        let mut iter = RollingWindows::new(10, 3, None).unwrap();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn rejects_too_few_groups() {
        let err = RollingWindows::new(10, 1, None).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn rejects_more_groups_than_rows() {
        let err = RollingWindows::new(4, 5, None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('5') && msg.contains('4'), "{msg}");
    }

    #[test]
    fn rejects_overlap_outside_unit_interval() {
        assert!(RollingWindows::new(10, 2, Some(1.5)).is_err());
        assert!(RollingWindows::new(10, 2, Some(-0.1)).is_err());
        assert!(RollingWindows::new(10, 2, Some(f64::NAN)).is_err());
    }

    #[test]
    fn groups_equal_to_size_gives_singletons() {
        let got = windows(4, 4, None);
        assert!(got.iter().all(|w| w.len() == 1));
        assert_eq!(got.last(), Some(&Window { start: 3, end: 4 }));
    }
}
