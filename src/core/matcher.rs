use crate::core::similarity::similarity;
use crate::domain::model::{
    category_priority, CandidateContact, MatchResult, SearchFilters, SearchOutcome, UNASSIGNED,
};
use std::collections::HashMap;

/// Minimum similarity for a candidate to count as a match.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Scores every candidate of each filtered category against that category's query.
///
/// Results are ordered by category priority (buyer, realtor, attorney,
/// lender), not by score. Within a category they keep discovery order.
pub fn search(filters: &SearchFilters, candidates: &[CandidateContact]) -> SearchOutcome {
    if filters.is_empty() {
        tracing::debug!("No search filters given, skipping scan");
        return SearchOutcome::default();
    }

    let mut results: Vec<MatchResult> = Vec::new();
    let mut index_by_id: HashMap<&str, usize> = HashMap::new();

    for (category, query) in filters.active() {
        for contact in candidates.iter().filter(|c| c.category == Some(category)) {
            let score = similarity(&contact.name, query);
            if score < SIMILARITY_THRESHOLD {
                continue;
            }

            match index_by_id.get(contact.id.as_str()) {
                Some(&idx) => {
                    if score > results[idx].score {
                        results[idx] = MatchResult {
                            contact: contact.clone(),
                            score,
                            matched_category: category,
                        };
                    }
                }
                None => {
                    index_by_id.insert(contact.id.as_str(), results.len());
                    results.push(MatchResult {
                        contact: contact.clone(),
                        score,
                        matched_category: category,
                    });
                }
            }
        }
    }

    // sort_by_key is stable
    results.sort_by_key(|r| category_priority(r.contact.category));

    let crossover = detect_crossover(&results);
    tracing::debug!(
        "Search over {} candidates with {} filters: {} matches, crossover {:?}",
        candidates.len(),
        filters.active_count(),
        results.len(),
        crossover
    );

    SearchOutcome { results, crossover }
}

/// Names the salesperson(s) holding most matches when more than one is represented.
///
/// Ties are joined with `" & "` in order of first appearance.
pub fn detect_crossover(results: &[MatchResult]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for name in results
        .iter()
        .map(|r| r.contact.salesperson_label())
        .filter(|name| *name != UNASSIGNED)
    {
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    if counts.len() <= 1 {
        return None;
    }

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let modal: Vec<&str> = counts
        .iter()
        .filter(|(_, c)| *c == max)
        .map(|(n, _)| *n)
        .collect();

    Some(modal.join(" & "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;

    fn candidates() -> Vec<CandidateContact> {
        vec![
            CandidateContact::new("1", "John Doe", Category::Buyer).assigned_to("Alice"),
            CandidateContact::new("2", "Jon Doe", Category::Buyer).assigned_to("Bob"),
            CandidateContact::new("3", "Mary Jones", Category::Realtor).assigned_to("Alice"),
            CandidateContact::new("4", "First Lakeside Bank", Category::Lender),
            CandidateContact::new("5", "Zed Zulu", Category::Buyer).assigned_to("Carol"),
        ]
    }

    #[test]
    fn test_search_returns_both_doe_contacts_with_tie_crossover() {
        let filters = SearchFilters::default().with(Category::Buyer, "John Doe");
        let outcome = search(&filters, &candidates());

        let ids: Vec<&str> = outcome.results.iter().map(|r| r.contact.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(outcome.results[0].score, 1.0);
        assert!(outcome.results[1].score >= SIMILARITY_THRESHOLD);
        assert_eq!(outcome.crossover.as_deref(), Some("Alice & Bob"));
    }

    #[test]
    fn test_modal_salesperson_wins_crossover() {
        let filters = SearchFilters::default()
            .with(Category::Buyer, "John Doe")
            .with(Category::Realtor, "Mary Jones");
        let outcome = search(&filters, &candidates());
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.crossover.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_results_ordered_by_category_not_score() {
        let filters = SearchFilters::default()
            .with(Category::Lender, "Lakeside Bank")
            .with(Category::Realtor, "Mary Jones")
            .with(Category::Buyer, "Jon Do");
        let outcome = search(&filters, &candidates());
        let categories: Vec<_> = outcome
            .results
            .iter()
            .map(|r| r.contact.category)
            .collect();
        assert_eq!(
            categories,
            vec![
                Some(Category::Buyer),
                Some(Category::Buyer),
                Some(Category::Realtor),
                Some(Category::Lender)
            ]
        );
    }

    #[test]
    fn test_category_filter_is_strict() {
        // Realtor query never considers buyers even with an exact name
        let filters = SearchFilters::default().with(Category::Realtor, "John Doe");
        let outcome = search(&filters, &candidates());
        assert!(outcome.is_empty());
        assert!(outcome.crossover.is_none());
    }

    #[test]
    fn test_empty_filters_yield_nothing() {
        let outcome = search(&SearchFilters::default().with(Category::Buyer, "   "), &candidates());
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_one_result_per_candidate_keeps_best_score() {
        // Joined store rows can repeat a contact id
        let rows = vec![
            CandidateContact::new("9", "Pat Kimm", Category::Buyer),
            CandidateContact::new("9", "Pat Kim", Category::Buyer),
            CandidateContact::new("9", "Pat Kimmel", Category::Buyer),
        ];
        let filters = SearchFilters::default().with(Category::Buyer, "  Pat Kim ");
        let outcome = search(&filters, &rows);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].matched_category, Category::Buyer);
        assert_eq!(outcome.results[0].score, 1.0);
        assert_eq!(outcome.results[0].contact.name, "Pat Kim");
    }

    #[test]
    fn test_crossover_ignores_unassigned() {
        let filters = SearchFilters::default()
            .with(Category::Buyer, "John Doe")
            .with(Category::Lender, "Lakeside Bank");
        let outcome = search(&filters, &candidates()[..1]);
        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.crossover.is_none());

        let mut all = candidates();
        all[1].salesperson = None;
        let outcome = search(&SearchFilters::default().with(Category::Buyer, "John Doe"), &all);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.crossover.is_none());
    }
}
