use contrast::similarity::{dimension_similarity, similarity_of};
use proptest::prelude::*;

fn dimension() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), -1.0e6f64..1.0e6f64]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        // Deterministic so failures reproduce.
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_similarity_is_symmetric(
        pairs in proptest::collection::vec((dimension(), dimension()), 0..32),
    ) {
        let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        prop_assert_eq!(similarity_of(&a, &b), similarity_of(&b, &a));
    }

    #[test]
    fn prop_identical_rows_score_one(
        values in proptest::collection::vec(dimension(), 1..32),
    ) {
        let score = similarity_of(&values, &values);
        if values.iter().all(|v| *v == 0.0) {
            prop_assert_eq!(score, None);
        } else {
            prop_assert_eq!(score, Some(1.0));
        }
    }

    #[test]
    fn prop_zero_against_nonzero_is_maximal(
        value in prop_oneof![-1.0e12f64..-1.0e-12, 1.0e-12f64..1.0e12],
    ) {
        prop_assert_eq!(similarity_of(&[0.0], &[value]), Some(0.0));
        prop_assert_eq!(similarity_of(&[value], &[0.0]), Some(0.0));
    }

    #[test]
    fn prop_all_zero_is_unavailable(len in 0usize..32) {
        let zeros = vec![0.0; len];
        prop_assert_eq!(similarity_of(&zeros, &zeros), None);
    }

    #[test]
    fn prop_score_stays_in_unit_interval(
        pairs in proptest::collection::vec((any::<Option<f64>>(), any::<Option<f64>>()), 0..32),
    ) {
        let (a, b): (Vec<Option<f64>>, Vec<Option<f64>>) = pairs.into_iter().unzip();
        // Non-finite cells never reach this function from a row
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        let a: Vec<Option<f64>> = a.into_iter().map(finite).collect();
        let b: Vec<Option<f64>> = b.into_iter().map(finite).collect();
        if let Some((score, pairs)) = dimension_similarity(&a, &b) {
            prop_assert!(score.is_finite());
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert!(pairs > 0);
        }
    }
}
