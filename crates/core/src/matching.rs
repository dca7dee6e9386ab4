//! Token-sort fuzzy matching over catalog records.
//!
//! Queries and candidate keys are casefolded, split on whitespace, sorted,
//! and rejoined before a normalized Levenshtein comparison, so word order
//! never affects the score. Scores are integers in `0..=100`.

use strsim::normalized_levenshtein;

/// Score a candidate must reach before it counts as a match at all.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 70;

/// Acceptance and strong-match thresholds applied to fuzzy scores.
///
/// A score below `acceptance_threshold` is rejected outright. A score at or
/// above `strong_match_threshold` is a confident product match; anything in
/// between is kept but flagged as a service-kind line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchPolicy {
    pub acceptance_threshold: u8,
    pub strong_match_threshold: u8,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            acceptance_threshold: DEFAULT_MATCH_THRESHOLD,
            strong_match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl MatchPolicy {
    pub fn new(acceptance_threshold: u8, strong_match_threshold: u8) -> Self {
        Self { acceptance_threshold, strong_match_threshold }
    }

    /// Whether a score clears the strong-match band.
    pub fn is_strong(&self, score: u8) -> bool {
        score >= self.strong_match_threshold
    }
}

/// Result of scanning a candidate list: the winning entity if one cleared
/// the threshold, plus the best score seen either way.
#[derive(Debug)]
pub struct MatchOutcome<'a, T> {
    pub entity: Option<&'a T>,
    pub score: u8,
}

fn token_sort_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Token-sort similarity between two strings as an integer percentage.
pub fn token_sort_ratio(left: &str, right: &str) -> u8 {
    let left_key = token_sort_key(left);
    let right_key = token_sort_key(right);
    (normalized_levenshtein(&left_key, &right_key) * 100.0).round() as u8
}

/// Scan `candidates` for the best token-sort match against `query`.
///
/// Candidates whose `key` returns `None` are excluded. Ties keep the first
/// candidate in list order. If the best score falls below `threshold` the
/// outcome carries no entity but still reports the score; an empty or
/// fully-excluded list reports a score of zero.
pub fn best_match<'a, T, F>(
    query: &str,
    candidates: &'a [T],
    key: F,
    threshold: u8,
) -> MatchOutcome<'a, T>
where
    F: Fn(&T) -> Option<String>,
{
    let mut best: Option<&'a T> = None;
    let mut best_score: u8 = 0;

    for candidate in candidates {
        let Some(candidate_key) = key(candidate) else {
            continue;
        };
        let score = token_sort_ratio(query, &candidate_key);
        if score > best_score {
            best = Some(candidate);
            best_score = score;
        }
    }

    if best_score < threshold {
        return MatchOutcome { entity: None, score: best_score };
    }
    MatchOutcome { entity: best, score: best_score }
}

#[cfg(test)]
mod tests {
    use super::{best_match, token_sort_ratio, MatchPolicy, DEFAULT_MATCH_THRESHOLD};

    fn keys(names: &[&str]) -> Vec<Option<String>> {
        names
            .iter()
            .map(|name| {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_lowercase())
                }
            })
            .collect()
    }

    fn identity(key: &Option<String>) -> Option<String> {
        key.clone()
    }

    #[test]
    fn identical_strings_score_full_marks_after_casefold() {
        assert_eq!(token_sort_ratio("Acme Corp", "acme corp"), 100);
    }

    #[test]
    fn word_order_does_not_change_the_score() {
        assert_eq!(token_sort_ratio("blue shirt", "shirt blue"), 100);
    }

    #[test]
    fn close_typo_clears_the_default_threshold() {
        let score = token_sort_ratio("Acme Crp", "acme corp");
        assert_eq!(score, 89);
        assert!(score >= DEFAULT_MATCH_THRESHOLD);
    }

    #[test]
    fn distant_strings_fall_below_the_default_threshold() {
        let score = token_sort_ratio("widget", "gadget");
        assert_eq!(score, 67);
        assert!(score < DEFAULT_MATCH_THRESHOLD);
    }

    #[test]
    fn below_threshold_reports_score_without_an_entity() {
        let candidates = keys(&["gadget"]);
        let outcome = best_match("widget", &candidates, identity, DEFAULT_MATCH_THRESHOLD);
        assert!(outcome.entity.is_none());
        assert_eq!(outcome.score, 67);
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let candidates = keys(&["blue shirt", "shirt blue"]);
        let outcome = best_match("Blue Shirt", &candidates, identity, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.entity, Some(&candidates[0]));
    }

    #[test]
    fn candidates_without_keys_are_excluded() {
        let candidates = keys(&["   ", "acme corp"]);
        let outcome = best_match("acme corp", &candidates, identity, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome.entity, Some(&candidates[1]));
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn empty_candidate_list_scores_zero() {
        let candidates: Vec<Option<String>> = Vec::new();
        let outcome = best_match("anything", &candidates, identity, DEFAULT_MATCH_THRESHOLD);
        assert!(outcome.entity.is_none());
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn strong_band_splits_on_the_policy_threshold() {
        let policy = MatchPolicy::new(70, 90);
        assert!(policy.is_strong(100));
        assert!(policy.is_strong(90));
        assert!(!policy.is_strong(89));
    }
}
