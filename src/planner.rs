use crate::config::Config;
use crate::node::{CandidateNode, RenamePlan};
use crate::pattern::{Pattern, Template};
use std::collections::HashSet;
use std::path::Path;
use tracing::{trace, warn};

/// Orders candidates deepest-first and computes their new names.
#[derive(Debug, Clone)]
pub struct RenamePlanner {
    find: Pattern,
    replacement: Template,
}

impl RenamePlanner {
    /// Creates a planner from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            find: config.find.clone(),
            replacement: config.replacement.clone(),
        }
    }

    /// Turns candidates into plans ordered by full path, descending.
    ///
    /// Paths are compared as raw bytes. A descendant's path extends its
    /// ancestor's, so every descendant comes before its ancestors and no
    /// directory is renamed while plans inside it are still pending.
    #[must_use]
    pub fn plan(&self, mut candidates: Vec<CandidateNode>) -> Vec<RenamePlan> {
        candidates.sort_by(|a, b| path_bytes(b.node().path()).cmp(path_bytes(a.node().path())));

        let plans: Vec<RenamePlan> = candidates
            .into_iter()
            .map(|candidate| {
                let node = candidate.into_node();
                let new_name = self.find.replace(node.name(), &self.replacement);
                trace!("Planned {} -> {}", node.name(), new_name);
                RenamePlan::new(node, new_name)
            })
            .collect();

        Self::warn_duplicate_targets(&plans);
        plans
    }

    fn warn_duplicate_targets(plans: &[RenamePlan]) {
        let mut seen = HashSet::new();
        for plan in plans.iter().filter(|p| !p.is_unchanged()) {
            if !seen.insert(plan.new_path()) {
                warn!(
                    "Several nodes would be renamed to {}; only the first can succeed",
                    plan.new_path().display()
                );
            }
        }
    }
}

fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().as_encoded_bytes()
}
