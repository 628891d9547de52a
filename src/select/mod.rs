//! Selection strategies: narrow the candidate set to the files that go into
//! the prompt.

use std::collections::HashSet;
use thiserror::Error;

pub mod oracle;
pub mod relevance;
pub mod tree;

pub use oracle::{HttpOracle, OracleError, RelevanceOracle};
pub use relevance::{keyword_matches, numbered_list, parse_indices, select_relevant};
pub use tree::{FileTree, TreeEntry, TreeNode};

use crate::domain::DEFAULT_FALLBACK_COUNT;

/// Manual-selection token meaning "everything".
pub const SELECT_ALL_TOKEN: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("select at least one file or folder, or `*` for everything")]
    NothingSelected,
}

/// Ordered set of chosen file paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    /// Keep the first occurrence of every path, in iteration order.
    pub fn from_ordered(paths: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let paths = paths.into_iter().filter(|p| seen.insert(p.clone())).collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// One entry picked in the manual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualChoice {
    All,
    Folder(String),
    File(String),
}

impl ManualChoice {
    /// Resolve a token typed or picked by the user against the tree.
    /// Returns `None` for paths the tree does not know.
    pub fn resolve(token: &str, tree: &FileTree) -> Option<Self> {
        let token = token.trim();
        if token == SELECT_ALL_TOKEN {
            return Some(Self::All);
        }
        let path = token.trim_end_matches('/');
        match tree.get(path)? {
            TreeNode::Folder(_) => Some(Self::Folder(path.to_string())),
            TreeNode::File => Some(Self::File(path.to_string())),
        }
    }
}

/// The closed set of ways to pick files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Every candidate
    Full,
    /// Oracle-backed goal matching with local fallbacks
    RelevanceQuery { goal: String, fallback_count: usize },
    /// Entries picked from the file tree
    ManualTree { choices: Vec<ManualChoice> },
}

impl SelectionStrategy {
    pub fn relevance(goal: impl Into<String>) -> Self {
        Self::RelevanceQuery { goal: goal.into(), fallback_count: DEFAULT_FALLBACK_COUNT }
    }

    pub fn select(
        &self,
        candidates: &[String],
        oracle: Option<&dyn RelevanceOracle>,
    ) -> Result<Selection, SelectionError> {
        match self {
            Self::Full => Ok(Selection::from_ordered(candidates.iter().cloned())),
            Self::RelevanceQuery { goal, fallback_count } => {
                Ok(select_relevant(candidates, goal, oracle, *fallback_count))
            }
            Self::ManualTree { choices } => expand_manual(candidates, choices),
        }
    }
}

/// Union of all manual choices, in discovery order. Folders expand to every
/// candidate under `"<folder>/"`.
pub fn expand_manual(
    candidates: &[String],
    choices: &[ManualChoice],
) -> Result<Selection, SelectionError> {
    if choices.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    if choices.contains(&ManualChoice::All) {
        return Ok(Selection::from_ordered(candidates.iter().cloned()));
    }

    let mut prefixes = Vec::new();
    let mut files = HashSet::new();
    for choice in choices {
        match choice {
            ManualChoice::All => {}
            ManualChoice::Folder(folder) => {
                let folder = folder.trim_end_matches('/');
                if folder.is_empty() {
                    return Ok(Selection::from_ordered(candidates.iter().cloned()));
                }
                prefixes.push(format!("{folder}/"));
            }
            ManualChoice::File(file) => {
                files.insert(file.as_str());
            }
        }
    }

    let selection = Selection::from_ordered(
        candidates
            .iter()
            .filter(|c| files.contains(c.as_str()) || prefixes.iter().any(|p| c.starts_with(p)))
            .cloned(),
    );
    if selection.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        ["README.md", "foo/a.rs", "foo/sub/b.rs", "foobar/c.rs", "src/a.js", "src/b.js"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn full_returns_candidates_unchanged() {
        let c = vec!["src/a.js".to_string(), "src/b.js".to_string(), "README.md".to_string()];
        let selection = SelectionStrategy::Full.select(&c, None).expect("full");
        assert_eq!(selection.paths(), c.as_slice());
    }

    #[test]
    fn folder_prefix_is_separator_anchored() {
        let strategy =
            SelectionStrategy::ManualTree { choices: vec![ManualChoice::Folder("foo".into())] };
        let selection = strategy.select(&candidates(), None).expect("manual");
        assert_eq!(selection.paths(), ["foo/a.rs", "foo/sub/b.rs"]);
    }

    #[test]
    fn folder_plus_own_file_has_no_duplicates() {
        let choices = vec![
            ManualChoice::File("foo/a.rs".into()),
            ManualChoice::Folder("foo/".into()),
            ManualChoice::File("README.md".into()),
        ];
        let selection = expand_manual(&candidates(), &choices).expect("manual");
        assert_eq!(selection.paths(), ["README.md", "foo/a.rs", "foo/sub/b.rs"]);
    }

    #[test]
    fn all_token_selects_everything() {
        let choices = vec![ManualChoice::File("README.md".into()), ManualChoice::All];
        let selection = expand_manual(&candidates(), &choices).expect("manual");
        assert_eq!(selection.len(), candidates().len());
    }

    #[test]
    fn nothing_chosen_is_a_validation_error() {
        assert_eq!(expand_manual(&candidates(), &[]), Err(SelectionError::NothingSelected));
        assert_eq!(
            expand_manual(&candidates(), &[ManualChoice::File("missing.rs".into())]),
            Err(SelectionError::NothingSelected)
        );
    }

    #[test]
    fn tokens_resolve_against_tree() {
        let tree = FileTree::build(&candidates());
        assert_eq!(ManualChoice::resolve("*", &tree), Some(ManualChoice::All));
        assert_eq!(ManualChoice::resolve("foo/", &tree), Some(ManualChoice::Folder("foo".into())));
        assert_eq!(
            ManualChoice::resolve("src/a.js", &tree),
            Some(ManualChoice::File("src/a.js".into()))
        );
        assert_eq!(ManualChoice::resolve("nope", &tree), None);
    }

    #[test]
    fn relevance_strategy_uses_default_fallback_count() {
        let strategy = SelectionStrategy::relevance("no-such-word");
        let many: Vec<String> = (0..8).map(|i| format!("f{i}.txt")).collect();
        let selection = strategy.select(&many, None).expect("relevance");
        assert_eq!(selection.len(), 5);
        assert_eq!(selection.paths()[0], "f0.txt");
    }
}
