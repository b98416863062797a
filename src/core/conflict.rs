use crate::core::nickname::NicknameExpander;
use crate::domain::model::{CandidateContact, ConflictReport};
use std::collections::HashSet;

/// True when every token occurs in `name` in order, case-insensitively.
///
/// Equivalent to a SQL `ILIKE '%t1%t2%...%'` pattern.
pub fn matches_in_order(name: &str, tokens: &[&str]) -> bool {
    let haystack = name.to_lowercase();
    let mut rest = haystack.as_str();
    for token in tokens {
        let token = token.to_lowercase();
        match rest.find(token.as_str()) {
            Some(pos) => rest = &rest[pos + token.len()..],
            None => return false,
        }
    }
    true
}

/// Checks whether a prospect is already known under any nickname variant.
pub struct ConflictChecker<'a> {
    expander: &'a NicknameExpander,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(expander: &'a NicknameExpander) -> Self {
        Self { expander }
    }

    pub fn check(&self, term: &str, candidates: &[CandidateContact]) -> ConflictReport {
        let normalized = term.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return ConflictReport {
                term: normalized,
                variants: Vec::new(),
                matches: Vec::new(),
            };
        }

        let variants = self.expander.expand(&normalized);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut matches = Vec::new();

        for variant in &variants {
            let tokens: Vec<&str> = variant.split(' ').filter(|t| !t.is_empty()).collect();
            let mut hits: Vec<&CandidateContact> = candidates
                .iter()
                .filter(|c| matches_in_order(&c.name, &tokens))
                .collect();
            hits.sort_by_cached_key(|c| c.name.to_lowercase());

            for contact in hits {
                if seen.insert(contact.id.as_str()) {
                    matches.push(contact.clone());
                }
            }
        }

        tracing::debug!(
            "Conflict check {:?}: {} variants, {} matches",
            normalized,
            variants.len(),
            matches.len()
        );

        ConflictReport {
            term: normalized,
            variants,
            matches,
        }
    }
}
