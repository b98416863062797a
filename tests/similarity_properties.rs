use contact_match::core::csv_import::{normalize, parse};
use contact_match::core::similarity::{edit_distance, similarity, SUBSTRING_MATCH_SCORE};
use proptest::prelude::*;

proptest! {
    #[test]
    fn similarity_with_itself_is_one(s in "\\PC{0,24}") {
        prop_assert_eq!(similarity(&s, &s), 1.0);
    }

    #[test]
    fn similarity_is_symmetric(a in "[a-zA-Z ]{0,16}", b in "[a-zA-Z ]{0,16}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_stays_in_unit_range(a in "\\PC{0,16}", b in "\\PC{0,16}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn containment_scores_fixed_constant(prefix in "[a-z]{1,8}", core in "[a-z]{1,8}") {
        let longer = format!("{} {}", prefix, core);
        prop_assert_eq!(similarity(&core, &longer), SUBSTRING_MATCH_SCORE);
    }

    #[test]
    fn edit_distance_bounded_by_longer_length(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let d = edit_distance(&a, &b);
        prop_assert!(d <= a.len().max(b.len()));
        prop_assert_eq!(d, edit_distance(&b, &a));
    }

    #[test]
    fn normalize_is_deterministic(rows in proptest::collection::vec("[A-Za-z ,]{0,20}", 0..6)) {
        let raw = format!("Name,Type,Email\n{}", rows.join("\n"));
        let parsed = parse(&raw);
        prop_assert_eq!(normalize(&parsed), normalize(&parsed));
    }
}
