//! Goal-driven selection: ask the oracle, then fall back to keyword
//! matching, then to the first few candidates. Never returns nothing while
//! there are candidates.

use std::collections::HashSet;

use super::oracle::RelevanceOracle;
use super::Selection;

/// `"1. src/a.js\n2. src/b.js"`, 1-based.
pub fn numbered_list<S: AsRef<str>>(candidates: &[S]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{}. {}", i + 1, path.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an oracle reply into 0-based candidate indices.
///
/// Each line contributes the number formed by all of its digits; lines with
/// no digits, indices outside `1..=count` and repeats are dropped. Reply
/// order is kept.
pub fn parse_indices(response: &str, count: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    response
        .lines()
        .filter_map(|line| {
            let digits: String = line.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<usize>().ok()
        })
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .filter(|idx| seen.insert(*idx))
        .collect()
}

/// Candidates whose path contains any whitespace-separated goal word,
/// case-insensitively, in discovery order.
pub fn keyword_matches<S: AsRef<str>>(candidates: &[S], goal: &str) -> Vec<String> {
    let words: Vec<String> = goal.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| {
            let lower = path.to_lowercase();
            words.iter().any(|w| lower.contains(w.as_str()))
        })
        .map(ToString::to_string)
        .collect()
}

pub fn select_relevant(
    candidates: &[String],
    goal: &str,
    oracle: Option<&dyn RelevanceOracle>,
    fallback_count: usize,
) -> Selection {
    if candidates.is_empty() {
        return Selection::default();
    }

    if let Some(oracle) = oracle {
        match oracle.rank(goal, &numbered_list(candidates)) {
            Ok(response) => {
                let indices = parse_indices(&response, candidates.len());
                if !indices.is_empty() {
                    tracing::debug!(picked = indices.len(), "oracle selection");
                    return Selection::from_ordered(indices.into_iter().map(|i| candidates[i].clone()));
                }
                tracing::warn!("oracle reply contained no usable file numbers, using keyword match");
            }
            Err(err) => {
                tracing::warn!(error = %err, "relevance oracle unavailable, using keyword match");
            }
        }
    }

    let matched = keyword_matches(candidates, goal);
    if !matched.is_empty() {
        return Selection::from_ordered(matched);
    }

    tracing::debug!(count = fallback_count, "no keyword match, taking leading candidates");
    Selection::from_ordered(candidates.iter().take(fallback_count).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::oracle::{HttpOracle, OracleError};
    use std::time::Duration;

    fn candidates() -> Vec<String> {
        [
            "README.md",
            "src/auth/login.rs",
            "src/auth/session.rs",
            "src/db.rs",
            "src/main.rs",
            "src/routes.rs",
            "tests/api.rs",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn numbered_list_is_one_based() {
        assert_eq!(numbered_list(&["a.rs", "b.rs"]), "1. a.rs\n2. b.rs");
    }

    #[test]
    fn indices_use_digit_extraction_and_range_checks() {
        let reply = "3\nfile #1\nnothing here\n0\n42\n3\n  2) \n";
        assert_eq!(parse_indices(reply, 5), vec![2, 0, 1]);
    }

    #[test]
    fn oracle_order_is_kept() {
        let oracle = |_: &str, _: &str| Ok::<_, OracleError>("4\n2\n".to_string());
        let selection = select_relevant(&candidates(), "anything", Some(&oracle), 5);
        assert_eq!(selection.paths(), ["src/db.rs", "src/auth/login.rs"]);
    }

    #[test]
    fn unusable_reply_falls_back_to_keywords() {
        let oracle = |_: &str, _: &str| Ok::<_, OracleError>("I cannot help with that.".to_string());
        let selection = select_relevant(&candidates(), "fix AUTH bug", Some(&oracle), 5);
        assert_eq!(selection.paths(), ["src/auth/login.rs", "src/auth/session.rs"]);
    }

    #[test]
    fn oracle_error_falls_back_to_keywords() {
        let oracle = |_: &str, _: &str| Err::<String, _>(OracleError::Status(500));
        let selection = select_relevant(&candidates(), "session", Some(&oracle), 5);
        assert_eq!(selection.paths(), ["src/auth/session.rs"]);
    }

    #[test]
    fn unreachable_oracle_without_keyword_match_takes_first_five() {
        let oracle = HttpOracle::new(
            "http://127.0.0.1:9/v1/chat/completions",
            "model",
            "key",
            Duration::from_secs(2),
        )
        .expect("client");
        let selection = select_relevant(&candidates(), "zzz qqq", Some(&oracle), 5);
        assert_eq!(
            selection.paths(),
            ["README.md", "src/auth/login.rs", "src/auth/session.rs", "src/db.rs", "src/main.rs"]
        );
    }

    #[test]
    fn blank_goal_without_oracle_takes_leading_candidates() {
        let selection = select_relevant(&candidates(), "   ", None, 2);
        assert_eq!(selection.paths(), ["README.md", "src/auth/login.rs"]);
    }

    #[test]
    fn no_candidates_means_empty_selection() {
        assert!(select_relevant(&[], "auth", None, 5).is_empty());
    }
}
