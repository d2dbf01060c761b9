//! Interchangeable scoring strategies.
//!
//! Both strategies share one contract: `score(name, query, ignore_case)`
//! returns a signed rank where higher means a better match. Which one runs is
//! configuration, never a code change at the call sites.

use crate::filter::chars_equal;

/// Bonus step added for every query character consumed inside an unbroken run.
const RUN_BONUS_STEP: i32 = 100;

/// Flat bonus when the candidate starts with the whole query.
const PREFIX_BONUS: i32 = 2;

/// Closed set of ranking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreStrategy {
    /// One-pass scorer rewarding long unbroken runs super-linearly.
    #[default]
    ConsecutiveRun,
    /// Levenshtein-distance scorer; better for typo-tolerant ranking.
    EditDistance,
}

impl ScoreStrategy {
    #[must_use]
    pub fn score(self, name: &str, query: &str, ignore_case: bool) -> i32 {
        match self {
            Self::ConsecutiveRun => consecutive_run(name, query, ignore_case),
            Self::EditDistance => edit_distance(name, query, ignore_case),
        }
    }

    /// Configuration name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConsecutiveRun => "consecutive-run",
            Self::EditDistance => "edit-distance",
        }
    }

    /// Resolve a configuration name back into a strategy.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "consecutive-run" => Some(Self::ConsecutiveRun),
            "edit-distance" => Some(Self::EditDistance),
            _ => None,
        }
    }
}

/// Walk name and query together, accumulating a bonus that grows inside
/// unbroken runs and resets on any miss. A run of length `k` contributes
/// `0 + 100 + ... + 100(k-1)`, so contiguous substring matches dominate
/// scattered character hits. Incomplete matches and length mismatches are
/// penalized after the walk.
fn consecutive_run(name: &str, query: &str, ignore_case: bool) -> i32 {
    let name: Vec<char> = name.chars().collect();
    let query: Vec<char> = query.chars().collect();

    let mut score = 0;
    let mut bonus = 0;
    let mut consumed = 0usize;

    for &candidate in &name {
        if consumed == query.len() {
            break;
        }
        if chars_equal(query[consumed], candidate, ignore_case) {
            score += bonus;
            bonus += RUN_BONUS_STEP;
            consumed += 1;
        } else {
            bonus = 0;
        }
    }

    score
        - (consumed as i32 - query.len() as i32).abs()
        - (name.len() as i32 - query.len() as i32).abs()
}

/// Classic Levenshtein distance over the full dynamic-programming matrix,
/// folded into a score where an exact match of equal length is the maximum.
fn edit_distance(name: &str, query: &str, ignore_case: bool) -> i32 {
    let name: Vec<char> = name.chars().collect();
    let query: Vec<char> = query.chars().collect();
    let cols = query.len() + 1;

    let mut matrix = vec![0usize; (name.len() + 1) * cols];
    for i in 0..=name.len() {
        matrix[i * cols] = i;
    }
    for j in 0..=query.len() {
        matrix[j] = j;
    }

    for i in 1..=name.len() {
        for j in 1..=query.len() {
            let cost = usize::from(!chars_equal(name[i - 1], query[j - 1], ignore_case));
            matrix[i * cols + j] = (matrix[(i - 1) * cols + j] + 1)
                .min(matrix[i * cols + j - 1] + 1)
                .min(matrix[(i - 1) * cols + j - 1] + cost);
        }
    }

    let distance = matrix[name.len() * cols + query.len()];
    let mut score = name.len().min(query.len()) as i32 - distance as i32;
    if starts_with_fold(&name, &query) {
        score += PREFIX_BONUS;
    }
    score
}

/// Case-insensitive prefix test over already-collected characters.
fn starts_with_fold(name: &[char], query: &[char]) -> bool {
    query.len() <= name.len()
        && !query.is_empty()
        && name
            .iter()
            .zip(query.iter())
            .all(|(&n, &q)| chars_equal(n, q, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [ScoreStrategy::ConsecutiveRun, ScoreStrategy::EditDistance] {
            assert_eq!(ScoreStrategy::from_name(strategy.as_str()), Some(strategy));
        }
        assert_eq!(ScoreStrategy::from_name("levenshtein"), None);
    }

    #[test]
    fn consecutive_run_rewards_unbroken_runs_superlinearly() {
        let strategy = ScoreStrategy::ConsecutiveRun;
        // "abc" inside "abcx": run of 3 -> 0 + 100 + 200, minus length penalty 1.
        assert_eq!(strategy.score("abcx", "abc", false), 299);
        // The same letters scattered collect no run bonus at all.
        assert_eq!(strategy.score("axbxc", "abc", false), -2);
    }

    #[test]
    fn consecutive_run_penalizes_incomplete_matches() {
        let strategy = ScoreStrategy::ConsecutiveRun;
        // "xyz" never matches "abc": zero consumed, both penalties apply.
        assert_eq!(strategy.score("xyz", "abc", false), -3);
    }

    #[test]
    fn exact_match_never_scores_below_a_scattered_one() {
        let strategy = ScoreStrategy::ConsecutiveRun;
        let name = "beta_values";
        let exact = strategy.score(name, name, false);
        for scattered in ["btvle", "eaau", "b_vls", "beta_vlu"] {
            assert!(
                exact >= strategy.score(name, scattered, false),
                "scattered {scattered}"
            );
        }
    }

    #[test]
    fn edit_distance_self_match_is_length_plus_prefix_bonus() {
        let strategy = ScoreStrategy::EditDistance;
        assert_eq!(strategy.score("Player", "Player", false), 6 + 2);
    }

    #[test]
    fn edit_distance_counts_substitutions() {
        let strategy = ScoreStrategy::EditDistance;
        // kitten -> sitting: distance 3, min length 6, no shared prefix.
        assert_eq!(strategy.score("kitten", "sitting", false), 3);
    }

    #[test]
    fn edit_distance_prefix_bonus_is_case_insensitive() {
        let strategy = ScoreStrategy::EditDistance;
        let with_prefix = strategy.score("player_one", "PLAYER", true);
        let without_prefix = strategy.score("one_player", "PLAYER", true);
        assert!(with_prefix > without_prefix);
    }

    #[test]
    fn case_rule_flows_into_the_matrix() {
        let strategy = ScoreStrategy::EditDistance;
        assert!(strategy.score("ABC", "abc", true) > strategy.score("ABC", "abc", false));
    }
}
