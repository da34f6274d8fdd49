use proptest::prelude::*;
use tinytable::resolve_range;

fn bound() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-40i64..40)
}

fn step() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(prop_oneof![-7i64..=-1, 1i64..=7])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn positions_are_in_bounds_and_evenly_spaced(
        len in 0usize..30,
        start in bound(),
        stop in bound(),
        step in step(),
    ) {
        let positions = resolve_range(len, start, stop, step).unwrap();
        let step = step.unwrap_or(1);
        prop_assert!(positions.iter().all(|&p| p < len));
        for pair in positions.windows(2) {
            prop_assert_eq!(pair[1] as i64 - pair[0] as i64, step);
        }
    }

    #[test]
    fn negative_bounds_count_from_the_end(
        len in 1usize..30,
        back in 1i64..30,
        stop in bound(),
        step in step(),
    ) {
        prop_assume!(back <= len as i64);
        let from_end = resolve_range(len, Some(-back), stop, step).unwrap();
        let absolute = resolve_range(len, Some(len as i64 - back), stop, step).unwrap();
        prop_assert_eq!(from_end, absolute);
    }

    #[test]
    fn unit_step_is_a_clamped_half_open_range(
        len in 0usize..30,
        start in 0i64..40,
        stop in 0i64..40,
    ) {
        let positions = resolve_range(len, Some(start), Some(stop), None).unwrap();
        let lo = (start as usize).min(len);
        let hi = (stop as usize).min(len);
        let expected: Vec<usize> = (lo..hi.max(lo)).collect();
        prop_assert_eq!(positions, expected);
    }

    #[test]
    fn reversed_full_slice_mirrors_forward(len in 0usize..30) {
        let mut forward = resolve_range(len, None, None, None).unwrap();
        forward.reverse();
        prop_assert_eq!(resolve_range(len, None, None, Some(-1)).unwrap(), forward);
    }
}
