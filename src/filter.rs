//! Candidate selection.
//!
//! Reduces the scanned set to the nodes eligible for renaming: type filter,
//! find pattern against the base name, exclusion pattern against the full
//! path. Depends only on its inputs, never on the filesystem.

use crate::config::Config;
use crate::node::{CandidateNode, ScannedNode};
use crate::pattern::Pattern;
use tracing::trace;

/// Result of filtering a scanned set.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Nodes to plan renames for
    pub candidates: Vec<CandidateNode>,

    /// Matching nodes dropped by the exclusion pattern
    pub excluded: Vec<ScannedNode>,
}

/// Selects rename candidates from scanned nodes.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    find: Pattern,
    exclude: Option<Pattern>,
    match_files: bool,
    match_directories: bool,
}

impl NodeFilter {
    /// Creates a filter from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            find: config.find.clone(),
            exclude: config.exclude.clone(),
            match_files: config.match_files,
            match_directories: config.match_directories,
        }
    }

    /// Splits `nodes` into candidates and excluded nodes.
    ///
    /// Nodes failing the type or find filter appear in neither list.
    #[must_use]
    pub fn apply(&self, nodes: Vec<ScannedNode>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for node in nodes {
            if !self.accepts_kind(&node) || !self.find.is_match(node.name()) {
                continue;
            }

            if self.is_excluded(&node) {
                trace!("Excluded {}", node.path().display());
                outcome.excluded.push(node);
                continue;
            }

            outcome.candidates.push(CandidateNode::new(node));
        }

        outcome
    }

    fn accepts_kind(&self, node: &ScannedNode) -> bool {
        (self.match_files && node.is_file()) || (self.match_directories && node.is_dir())
    }

    fn is_excluded(&self, node: &ScannedNode) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|exclude| exclude.is_match(&node.path().to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn filter(find: &str, exclude: Option<&str>, files: bool, dirs: bool) -> NodeFilter {
        NodeFilter {
            find: Pattern::new(find).unwrap(),
            exclude: exclude.map(|p| Pattern::new(p).unwrap()),
            match_files: files,
            match_directories: dirs,
        }
    }

    fn candidate_paths(outcome: &FilterOutcome) -> Vec<String> {
        outcome
            .candidates
            .iter()
            .map(|c| c.node().path().display().to_string())
            .collect()
    }

    fn sample() -> Vec<ScannedNode> {
        vec![
            ScannedNode::new("/a/b", "baz", NodeKind::Directory),
            ScannedNode::new("/a/b/baz", "c.txt", NodeKind::File),
            ScannedNode::new("/a/b", "d.txt", NodeKind::File),
            ScannedNode::new("/a/b", "notes.txt.d", NodeKind::Directory),
            ScannedNode::new("/a/b", "fifo.txt", NodeKind::Other),
        ]
    }

    #[test]
    fn test_find_pattern_tests_name_only() {
        let outcome = filter("/^b/", None, true, true).apply(sample());

        // "/a/b/..." paths all contain "b", only one name starts with it
        assert_eq!(candidate_paths(&outcome), vec!["/a/b/baz"]);
    }

    #[test]
    fn test_exclusion_tests_full_path() {
        let outcome = filter(r"/\.txt$/", Some("/baz/"), true, true).apply(sample());

        assert_eq!(candidate_paths(&outcome), vec!["/a/b/d.txt"]);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.excluded[0].path().to_str(), Some("/a/b/baz/c.txt"));
    }

    #[test]
    fn test_files_only() {
        let outcome = filter("/txt/", None, true, false).apply(sample());

        assert_eq!(
            candidate_paths(&outcome),
            vec!["/a/b/baz/c.txt", "/a/b/d.txt"]
        );
    }

    #[test]
    fn test_directories_only() {
        let outcome = filter("/txt/", None, false, true).apply(sample());

        assert_eq!(candidate_paths(&outcome), vec!["/a/b/notes.txt.d"]);
    }

    #[test]
    fn test_other_kinds_never_match() {
        let outcome = filter("fifo", None, true, true).apply(sample());
        assert!(outcome.candidates.is_empty());
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn test_filter_is_deterministic() {
        let f = filter(r"/\.txt$/", Some("/baz/"), true, true);
        let first = f.apply(sample());
        let second = f.apply(sample());

        assert_eq!(first.candidates, second.candidates);
        assert_eq!(first.excluded, second.excluded);
    }
}
