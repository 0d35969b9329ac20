use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use dvd_search::search::{
    BoostConfig, CatalogText, HashEmbedder, HybridSearch, ItemText, LexicalMatch, lexical_bonus,
};
use dvd_search::storage::{ItemId, MemoryVectorStore};

const WORDS: &[&str] = &[
    "astronaut", "clown", "space", "circus", "heist", "desert", "ocean", "robot", "detective",
    "dragon",
];

fn arb_sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..6).prop_map(|words| words.join(" "))
}

fn arb_catalog() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_sentence(), arb_sentence()), 0..12)
}

fn build(items: &[(String, String)]) -> (HybridSearch, HashMap<ItemId, CatalogText>) {
    let engine = HybridSearch::new(
        Arc::new(HashEmbedder::new(64)),
        Arc::new(MemoryVectorStore::new()),
    );
    let mut filter = HashMap::new();
    for (index, (title, description)) in items.iter().enumerate() {
        let item_id = index as ItemId + 1;
        engine.index(item_id, description).unwrap();
        filter.insert(item_id, CatalogText::new(title.clone(), description.clone()));
    }
    (engine, filter)
}

proptest! {
    #[test]
    fn result_count_is_min_of_limit_and_admitted(
        items in arb_catalog(),
        query in arb_sentence(),
        limit in 1usize..20,
    ) {
        let (engine, filter) = build(&items);
        let results = engine.search(&query, &filter, limit).unwrap();
        prop_assert_eq!(results.len(), limit.min(items.len()));
    }

    #[test]
    fn results_are_sorted_with_id_tiebreak(items in arb_catalog(), query in arb_sentence()) {
        let (engine, filter) = build(&items);
        let results = engine.search(&query, &filter, 50).unwrap();
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.final_score > b.final_score
                    || (a.final_score == b.final_score && a.item_id < b.item_id)
            );
        }
    }

    #[test]
    fn final_score_is_similarity_plus_bonus(items in arb_catalog(), query in arb_sentence()) {
        let (engine, filter) = build(&items);
        for candidate in engine.search(&query, &filter, 50).unwrap() {
            prop_assert!((-1.0..=1.0).contains(&candidate.similarity));
            prop_assert_eq!(candidate.final_score, candidate.similarity + candidate.lexical_bonus);
        }
    }

    #[test]
    fn title_match_never_scores_below_description_match(
        query in arb_sentence(),
        title in arb_sentence(),
        description in arb_sentence(),
    ) {
        let boosts = BoostConfig::default();
        let text = ItemText { title: &title, description: &description };
        let (bonus, matched) = lexical_bonus(&query, text, boosts);

        match matched {
            LexicalMatch::Title => {
                prop_assert!(title.contains(&query));
                prop_assert_eq!(bonus, boosts.title_boost());
            }
            LexicalMatch::Description => {
                prop_assert!(!title.contains(&query));
                prop_assert!(description.contains(&query));
                prop_assert_eq!(bonus, boosts.description_boost());
            }
            LexicalMatch::None => {
                prop_assert!(!title.contains(&query) && !description.contains(&query));
                prop_assert_eq!(bonus, 0.0);
            }
        }
    }

    #[test]
    fn adding_a_match_never_lowers_the_bonus(
        query in arb_sentence(),
        title in arb_sentence(),
        description in arb_sentence(),
    ) {
        let boosts = BoostConfig::default();
        let plain = lexical_bonus(&query, ItemText { title: &title, description: &description }, boosts).0;

        let boosted_description = format!("{description} {query}");
        let with_description = lexical_bonus(
            &query,
            ItemText { title: &title, description: &boosted_description },
            boosts,
        ).0;

        let boosted_title = format!("{title} {query}");
        let with_title = lexical_bonus(
            &query,
            ItemText { title: &boosted_title, description: &description },
            boosts,
        ).0;

        prop_assert!(with_description >= plain);
        prop_assert!(with_title >= with_description);
        prop_assert_eq!(with_title, boosts.title_boost());
    }
}
