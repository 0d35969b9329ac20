use proptest::prelude::*;

use dvd_search::search::cosine_similarity;

fn arb_vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0, dims)
}

fn arb_pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (1usize..64).prop_flat_map(|dims| (arb_vector(dims), arb_vector(dims)))
}

proptest! {
    #[test]
    fn cosine_is_bounded((a, b) in arb_pair()) {
        let sim = cosine_similarity(&a, &b).unwrap();
        prop_assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn cosine_is_symmetric((a, b) in arb_pair()) {
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn self_similarity_is_one(a in arb_vector(32)) {
        prop_assume!(a.iter().any(|x| x.abs() > 1e-3));
        let sim = cosine_similarity(&a, &a).unwrap();
        prop_assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_vector_scores_zero(a in arb_vector(16)) {
        let zero = vec![0.0f32; 16];
        prop_assert_eq!(cosine_similarity(&a, &zero).unwrap(), 0.0);
        prop_assert_eq!(cosine_similarity(&zero, &a).unwrap(), 0.0);
    }

    #[test]
    fn length_mismatch_is_error(a in arb_vector(8), b in arb_vector(9)) {
        prop_assert!(cosine_similarity(&a, &b).is_err());
    }
}
