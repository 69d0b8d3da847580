use std::collections::HashSet;

use group_split::{
    group_length, split_slice, Group, GroupSplitOptions, IndexPartitioner, TestSize,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn partitioner(n: usize, seed: u64) -> IndexPartitioner<usize> {
    let ids: Vec<usize> = (0..n).collect();
    IndexPartitioner::new(&ids, true, Some(seed))
}

fn expected_test_len(len: usize, test_frac: f64) -> usize {
    (len as f64 * test_frac).ceil() as usize
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        .. ProptestConfig::default()
    })]

    #[test]
    fn fraction_split_sizes_and_disjointness(
        n in 0usize..300,
        test_frac in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let split = partitioner(n, seed)
            .train_test_split(TestSize::Fraction(test_frac))
            .expect("fraction in [0, 1] should split");

        prop_assert_eq!(split.test.len(), expected_test_len(n, test_frac));
        prop_assert_eq!(split.train.len() + split.test.len(), n);

        let train: HashSet<usize> = split.train.iter().copied().collect();
        prop_assert!(split.test.iter().all(|id| !train.contains(id)));
    }

    #[test]
    fn explicit_count_is_exact(
        (n, count) in (1usize..300).prop_flat_map(|n| (Just(n), 0..n)),
        seed in any::<u64>(),
    ) {
        let split = partitioner(n, seed)
            .train_test_split(TestSize::Count(count))
            .expect("count below size should split");
        prop_assert_eq!(split.test.len(), count);
        prop_assert_eq!(split.train.len(), n - count);
    }

    #[test]
    fn count_at_or_above_size_is_rejected(
        n in 0usize..100,
        extra in 0usize..10,
    ) {
        let result = partitioner(n, 1).train_test_split(TestSize::Count(n + extra));
        prop_assert!(result.is_err());
    }

    #[test]
    fn raw_groups_tile_the_index_without_overlap(
        (n, groups) in (2usize..200).prop_flat_map(|n| (Just(n), 2..=n)),
        seed in any::<u64>(),
    ) {
        let partitioner = partitioner(n, seed);
        let produced: Vec<Group<usize>> = partitioner
            .group_split(GroupSplitOptions::new(groups).with_test_set(false))
            .expect("valid group request")
            .collect();

        prop_assert_eq!(produced.len(), groups);
        let mut joined = Vec::with_capacity(n);
        for (i, group) in produced.iter().enumerate() {
            let ids = group.as_ids().expect("raw ids without a test set");
            prop_assert_eq!(ids.len(), group_length(i, n, groups));
            joined.extend_from_slice(ids);
        }
        prop_assert_eq!(joined.as_slice(), partitioner.index());
    }

    #[test]
    fn overlapping_groups_end_where_groups_end(
        (n, groups) in (2usize..200).prop_flat_map(|n| (Just(n), 2..=n)),
        overlap in 0.0f64..=1.0,
    ) {
        let ids: Vec<usize> = (0..n).collect();
        let partitioner = IndexPartitioner::new(&ids, false, None);
        let produced: Vec<Group<usize>> = partitioner
            .group_split(
                GroupSplitOptions::new(groups)
                    .with_overlap(overlap)
                    .with_test_set(false),
            )
            .expect("valid group request")
            .collect();

        prop_assert_eq!(produced.len(), groups);
        let mut end = 0;
        for (i, group) in produced.iter().enumerate() {
            end += group_length(i, n, groups);
            let ids = group.as_ids().expect("raw ids without a test set");
            prop_assert!(ids.len() >= group_length(i, n, groups));
            prop_assert_eq!(ids.last().copied(), Some(end - 1));
            // contiguous run of the stored order
            prop_assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
        }
        prop_assert_eq!(end, n);
    }

    #[test]
    fn split_groups_follow_slice_split(
        (n, groups) in (2usize..150).prop_flat_map(|n| (Just(n), 2..=n)),
        overlap in prop::option::of(0.0f64..=1.0),
        test_frac in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let partitioner = partitioner(n, seed);
        let mut options = GroupSplitOptions::new(groups).with_test_frac(test_frac);
        options.overlap = overlap;

        let raw: Vec<Group<usize>> = partitioner
            .group_split(options.with_test_set(false))
            .expect("valid group request")
            .collect();
        let split: Vec<Group<usize>> = partitioner
            .group_split(options)
            .expect("valid group request")
            .collect();

        prop_assert_eq!(raw.len(), split.len());
        for (raw, split) in raw.iter().zip(&split) {
            let ids = raw.as_ids().expect("raw ids");
            let expected = split_slice(ids, TestSize::Fraction(test_frac))
                .expect("fraction in [0, 1] should split");
            prop_assert_eq!(split.as_split(), Some(&expected));
            prop_assert_eq!(expected.test.len(), expected_test_len(ids.len(), test_frac));
        }
    }

    #[test]
    fn same_seed_reproduces_everything(
        n in 2usize..200,
        seed in any::<u64>(),
    ) {
        let a = partitioner(n, seed);
        let b = partitioner(n, seed);
        prop_assert_eq!(a.index(), b.index());

        let options = GroupSplitOptions::new(2).with_overlap(0.5);
        let from_a: Vec<_> = a.group_split(options).expect("valid").collect();
        let from_b: Vec<_> = b.group_split(options).expect("valid").collect();
        prop_assert_eq!(from_a, from_b);
    }

    #[test]
    fn invalid_group_requests_are_rejected(
        n in 1usize..100,
        overlap in 1.0001f64..10.0,
    ) {
        let partitioner = partitioner(n, 0);
        prop_assert!(partitioner.group_split(GroupSplitOptions::new(1)).is_err());
        prop_assert!(partitioner.group_split(GroupSplitOptions::new(n + 1)).is_err());
        prop_assert!(partitioner
            .group_split(GroupSplitOptions::new(2).with_overlap(overlap))
            .is_err());
    }
}
