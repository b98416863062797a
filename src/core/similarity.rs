//! Name similarity scoring.
//!
//! Scores are case-insensitive and lie in `[0.0, 1.0]`. Exact matches score
//! 1.0, containment of one name in the other scores [`SUBSTRING_MATCH_SCORE`],
//! everything else falls back to normalised Levenshtein distance.

use smallvec::SmallVec;

/// Score given when one name contains the other, regardless of length difference.
pub const SUBSTRING_MATCH_SCORE: f64 = 0.8;

/// Classic Levenshtein distance over Unicode scalar values, unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: SmallVec<[char; 32]> = a.chars().collect();
    let b: SmallVec<[char; 32]> = b.chars().collect();
    dp_distance(&a, &b)
}

fn dp_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Shorter string on the column axis keeps the row small
    let (target, source) = if a.len() < b.len() { (a, b) } else { (b, a) };

    let mut row: SmallVec<[usize; 64]> = (0..=target.len()).collect();

    for (i, &sc) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &tc) in target.iter().enumerate() {
            let cost = usize::from(sc != tc);
            let substitution = diagonal + cost;
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[target.len()]
}

/// Case-insensitive similarity between two names.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return SUBSTRING_MATCH_SCORE;
    }

    let a: SmallVec<[char; 32]> = a.chars().collect();
    let b: SmallVec<[char; 32]> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    let distance = dp_distance(&a, &b);
    (longest - distance) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_basic() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn test_edit_distance_unicode() {
        assert_eq!(edit_distance("josé", "jose"), 1);
        assert_eq!(edit_distance("日本語", "日本"), 1);
    }

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(similarity("Jane Doe", "jane doe"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_substring_rule() {
        assert_eq!(similarity("Smith", "John Smith"), SUBSTRING_MATCH_SCORE);
        assert_eq!(similarity("Robert Smith Jr", "robert smith"), SUBSTRING_MATCH_SCORE);
        // An empty query is contained in every name
        assert_eq!(similarity("Anyone", ""), SUBSTRING_MATCH_SCORE);
    }

    #[test]
    fn test_edit_distance_path() {
        // "robert smith" -> "rob smith": three deletions over twelve chars
        let score = similarity("Robert Smith", "Rob Smith");
        assert!((score - 0.75).abs() < 1e-9);

        let score = similarity("John Doe", "Jon Doe");
        assert!((score - 0.875).abs() < 1e-9);

        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_symmetry_on_samples() {
        let pairs = [("Kathy Jones", "Katherine Jones"), ("Ann", "Anne"), ("Bob", "Rob")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }
}
