//! Folder/file hierarchy built from candidate paths, used by manual selection.

use std::collections::BTreeMap;

/// A node in the file tree. Folders always have at least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Folder(BTreeMap<String, TreeNode>),
    File,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// One row of the flattened tree, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Full relative path (no trailing separator)
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
}

impl TreeEntry {
    /// Indented display label; folders carry a trailing `/`.
    pub fn label(&self) -> String {
        let indent = "  ".repeat(self.depth);
        if self.is_folder {
            format!("{indent}{}/", self.name)
        } else {
            format!("{indent}{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    root: BTreeMap<String, TreeNode>,
}

impl FileTree {
    pub fn build<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut tree = Self::default();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    fn insert(&mut self, path: &str) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, folders)) = segments.split_last() else {
            return;
        };

        let mut level = &mut self.root;
        for segment in folders {
            let node = level
                .entry((*segment).to_string())
                .or_insert_with(|| TreeNode::Folder(BTreeMap::new()));
            if !node.is_folder() {
                *node = TreeNode::Folder(BTreeMap::new());
            }
            let TreeNode::Folder(children) = node else {
                return;
            };
            level = children;
        }
        level.entry((*leaf).to_string()).or_insert(TreeNode::File);
    }

    /// Look up a node by its `/`-separated path.
    pub fn get(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                TreeNode::Folder(children) => node = children.get(segment)?,
                TreeNode::File => return None,
            }
        }
        Some(node)
    }

    pub fn is_folder(&self, path: &str) -> bool {
        self.get(path).is_some_and(TreeNode::is_folder)
    }

    /// Depth-first listing; at each level folders come before files, both
    /// in name order.
    pub fn entries(&self) -> Vec<TreeEntry> {
        let mut out = Vec::new();
        flatten(&self.root, "", 0, &mut out);
        out
    }
}

fn flatten(level: &BTreeMap<String, TreeNode>, prefix: &str, depth: usize, out: &mut Vec<TreeEntry>) {
    let folders = level.iter().filter(|(_, node)| node.is_folder());
    let files = level.iter().filter(|(_, node)| !node.is_folder());

    for (name, node) in folders.chain(files) {
        let path = if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
        out.push(TreeEntry {
            path: path.clone(),
            name: name.clone(),
            depth,
            is_folder: node.is_folder(),
        });
        if let TreeNode::Folder(children) = node {
            flatten(children, &path, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileTree {
        FileTree::build(&["src/a.js", "src/lib/b.js", "README.md", "src/lib/c.js", "docs/guide.md"])
    }

    #[test]
    fn folders_exist_only_where_paths_imply_them() {
        let tree = sample();
        assert!(tree.is_folder("src"));
        assert!(tree.is_folder("src/lib"));
        assert!(tree.is_folder("docs"));
        assert_eq!(tree.get("README.md"), Some(&TreeNode::File));
        assert_eq!(tree.get("src/lib/b.js"), Some(&TreeNode::File));
        assert!(tree.get("src/lib/missing.js").is_none());
        assert!(tree.get("README.md/x").is_none());
    }

    #[test]
    fn file_shadowed_by_folder_becomes_folder() {
        let tree = FileTree::build(&["bin", "bin/run.sh"]);
        assert!(tree.is_folder("bin"));
        assert_eq!(tree.get("bin/run.sh"), Some(&TreeNode::File));
    }

    #[test]
    fn every_folder_has_children() {
        fn check(level: &BTreeMap<String, TreeNode>) {
            for node in level.values() {
                if let TreeNode::Folder(children) = node {
                    assert!(!children.is_empty());
                    check(children);
                }
            }
        }
        check(&sample().root);
    }

    #[test]
    fn entries_list_folders_first_depth_first() {
        let labels: Vec<String> = sample().entries().iter().map(TreeEntry::label).collect();
        assert_eq!(
            labels,
            vec![
                "docs/",
                "  guide.md",
                "src/",
                "  lib/",
                "    b.js",
                "    c.js",
                "  a.js",
                "README.md",
            ]
        );
    }

    #[test]
    fn entry_paths_are_full_relative_paths() {
        let entries = sample().entries();
        let lib = entries.iter().find(|e| e.name == "lib").expect("lib entry");
        assert_eq!(lib.path, "src/lib");
        assert!(lib.is_folder);
        assert_eq!(lib.depth, 1);
    }
}
