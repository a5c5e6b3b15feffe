use crate::node::RenamePlan;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::path::MAIN_SEPARATOR;

/// Role of a run of characters in a name diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Present in both names
    Common,
    /// Only in the old name
    Removed,
    /// Only in the new name
    Added,
}

/// A maximal run of characters with the same role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Role of the run
    pub kind: SegmentKind,
    /// Characters of the run
    pub text: String,
}

/// Character-level alignment between an old and a new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameDiff {
    /// Common and removed runs, spelling the old name
    pub old: Vec<Segment>,
    /// Common and added runs, spelling the new name
    pub new: Vec<Segment>,
}

impl NameDiff {
    /// Diffs two names character by character.
    #[must_use]
    pub fn compute(old: &str, new: &str) -> Self {
        let mut diff = Self {
            old: Vec::new(),
            new: Vec::new(),
        };

        for change in TextDiff::from_chars(old, new).iter_all_changes() {
            let text = change.value();
            match change.tag() {
                ChangeTag::Equal => {
                    push_run(&mut diff.old, SegmentKind::Common, text);
                    push_run(&mut diff.new, SegmentKind::Common, text);
                }
                ChangeTag::Delete => push_run(&mut diff.old, SegmentKind::Removed, text),
                ChangeTag::Insert => push_run(&mut diff.new, SegmentKind::Added, text),
            }
        }

        diff
    }
}

fn push_run(segments: &mut Vec<Segment>, kind: SegmentKind, text: &str) {
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => segments.push(Segment {
            kind,
            text: text.to_string(),
        }),
    }
}

/// Renders a rename plan as `old => new` with the changed runs marked.
///
/// With color, removed runs are red and struck through and added runs are
/// green. Without color they are written `[-removed-]` and `{+added+}`.
#[derive(Debug, Clone, Copy)]
pub struct PreviewRenderer {
    color: bool,
}

impl PreviewRenderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders `plan` without touching the filesystem.
    #[must_use]
    pub fn render(&self, plan: &RenamePlan) -> String {
        let diff = NameDiff::compute(plan.name(), plan.new_name());

        let mut prefix = plan.node().parent().display().to_string();
        if !prefix.ends_with(MAIN_SEPARATOR) {
            prefix.push(MAIN_SEPARATOR);
        }
        let prefix = if self.color {
            prefix.dimmed().to_string()
        } else {
            prefix
        };

        format!(
            "{prefix}{} => {prefix}{}",
            self.render_segments(&diff.old),
            self.render_segments(&diff.new)
        )
    }

    fn render_segments(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| match (segment.kind, self.color) {
                (SegmentKind::Common, _) => segment.text.clone(),
                (SegmentKind::Removed, true) => segment.text.red().strikethrough().to_string(),
                (SegmentKind::Added, true) => segment.text.green().bold().to_string(),
                (SegmentKind::Removed, false) => format!("[-{}-]", segment.text),
                (SegmentKind::Added, false) => format!("{{+{}+}}", segment.text),
            })
            .collect()
    }
}
