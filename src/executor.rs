use crate::{
    config::{Config, FailurePolicy},
    error::{Error, Result},
    node::RenamePlan,
    preview::PreviewRenderer,
    report::Reporter,
};
use std::{
    fs,
    path::{Component, Path},
};
use tracing::{debug, warn};

/// Counters for one execution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Renames applied (or previewed in dry run)
    pub renamed: usize,

    /// Plans skipped because the name did not change
    pub unchanged: usize,

    /// Renames that failed
    pub failed: usize,
}

/// Applies rename plans one at a time, in the order given.
#[derive(Debug, Clone)]
pub struct RenameExecutor {
    dry_run: bool,
    failure_policy: FailurePolicy,
    preview: PreviewRenderer,
}

impl RenameExecutor {
    /// Creates an executor from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            dry_run: config.dry_run,
            failure_policy: config.failure_policy,
            preview: PreviewRenderer::new(config.color),
        }
    }

    /// Executes `plans` sequentially. Each rename completes before the next
    /// one is issued; in dry run nothing is renamed and each plan is rendered
    /// as a preview instead. Plans a live run would refuse are reported as
    /// failed in dry run too, without stopping the preview.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rename`] for the first failed rename under
    /// [`FailurePolicy::Abort`], and [`Error::Output`] if reporting fails.
    pub fn execute(&self, plans: &[RenamePlan], reporter: &mut Reporter) -> Result<ExecutionStats> {
        let mut stats = ExecutionStats::default();

        for plan in plans {
            if plan.is_unchanged() {
                reporter.unchanged(plan)?;
                stats.unchanged += 1;
                continue;
            }

            if self.dry_run {
                // Nothing has been touched, so a refused plan never stops the preview
                match Self::check(plan) {
                    Ok(()) => {
                        reporter.previewed(&self.preview.render(plan))?;
                        stats.renamed += 1;
                    }
                    Err(err) => {
                        warn!("{}", err);
                        reporter.failed(plan, &cause(&err))?;
                        stats.failed += 1;
                    }
                }
                continue;
            }

            match Self::rename(plan) {
                Ok(()) => {
                    debug!(
                        "Renamed {} -> {}",
                        plan.path().display(),
                        plan.new_path().display()
                    );
                    reporter.renamed(plan)?;
                    stats.renamed += 1;
                }
                Err(err) => {
                    reporter.failed(plan, &cause(&err))?;
                    stats.failed += 1;

                    match self.failure_policy {
                        FailurePolicy::Abort => {
                            warn!("Aborting after failed rename of {}", plan.path().display());
                            return Err(err);
                        }
                        FailurePolicy::Continue => {
                            warn!("{}", err);
                        }
                    }
                }
            }
        }

        Ok(stats)
    }

    /// Renames a single node, refusing to replace an existing target.
    fn rename(plan: &RenamePlan) -> Result<()> {
        Self::check(plan)?;

        let (from, to) = (plan.path(), plan.new_path());
        fs::rename(from, to).map_err(|e| Error::rename(from, to, e.to_string()))
    }

    /// Refuses plans a live rename must not attempt. Dry run shares it so
    /// previews fail the same way.
    fn check(plan: &RenamePlan) -> Result<()> {
        let (from, to) = (plan.path(), plan.new_path());

        if plan.new_name().is_empty() {
            return Err(Error::rename(from, to, "new name is empty"));
        }

        if !is_single_segment(plan.new_name()) {
            return Err(Error::rename(
                from,
                to,
                "new name must be a single path segment",
            ));
        }

        // `fs::rename` silently replaces an existing file on most platforms
        if to.symlink_metadata().is_ok() && !is_same_entry(from, to) {
            return Err(Error::rename(from, to, "target already exists"));
        }

        Ok(())
    }
}

fn cause(err: &Error) -> String {
    match err {
        Error::Rename { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// True when `name` stays inside the parent: one normal component, no
/// separators, no `.` or `..`, no root or prefix.
fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == name
    )
}

/// True when `to` only differs from `from` by case and resolves to the same
/// entry, as happens on case-insensitive filesystems.
fn is_same_entry(from: &Path, to: &Path) -> bool {
    let same_spelling = from
        .to_string_lossy()
        .to_lowercase()
        .eq(&to.to_string_lossy().to_lowercase());

    same_spelling && same_inode(from, to)
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_a: &Path, _b: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, ScannedNode};
    use crate::report::tests::SharedBuffer;
    use assert_fs::prelude::*;

    fn executor(dry_run: bool, failure_policy: FailurePolicy) -> RenameExecutor {
        RenameExecutor {
            dry_run,
            failure_policy,
            preview: PreviewRenderer::new(false),
        }
    }

    fn plan(parent: &Path, name: &str, new_name: &str) -> RenamePlan {
        RenamePlan::new(ScannedNode::new(parent, name, NodeKind::File), new_name)
    }

    fn reporter(buffer: &SharedBuffer, dry_run: bool) -> Reporter {
        Reporter::new(Box::new(buffer.clone()), false, dry_run)
    }

    #[test]
    fn test_live_rename() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        let buffer = SharedBuffer::default();

        let stats = executor(false, FailurePolicy::Abort)
            .execute(&[plan(temp.path(), "a.txt", "b.txt")], &mut reporter(&buffer, false))
            .unwrap();

        assert_eq!(stats.renamed, 1);
        temp.child("a.txt").assert(predicates::path::missing());
        temp.child("b.txt").assert("a");
        assert!(buffer.contents().starts_with("[RENAMED] "));
    }

    #[test]
    fn test_existing_target_fails_and_source_is_untouched() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("source").unwrap();
        temp.child("b.txt").write_str("target").unwrap();
        let buffer = SharedBuffer::default();

        let err = executor(false, FailurePolicy::Abort)
            .execute(&[plan(temp.path(), "a.txt", "b.txt")], &mut reporter(&buffer, false))
            .unwrap_err();

        assert!(err.is_rename());
        temp.child("a.txt").assert("source");
        temp.child("b.txt").assert("target");
        assert!(buffer.contents().contains("[FAILED]"));
        assert!(buffer.contents().contains("target already exists"));
    }

    #[test]
    fn test_abort_stops_remaining_plans() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        temp.child("b.txt").write_str("b").unwrap();
        temp.child("c.txt").write_str("c").unwrap();
        let buffer = SharedBuffer::default();

        let plans = [
            plan(temp.path(), "a.txt", "b.txt"),
            plan(temp.path(), "c.txt", "d.txt"),
        ];
        let result = executor(false, FailurePolicy::Abort).execute(&plans, &mut reporter(&buffer, false));

        assert!(result.is_err());
        temp.child("c.txt").assert("c");
        temp.child("d.txt").assert(predicates::path::missing());
    }

    #[test]
    fn test_continue_keeps_going_with_precomputed_targets() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        temp.child("b.txt").write_str("b").unwrap();
        temp.child("c.txt").write_str("c").unwrap();
        let buffer = SharedBuffer::default();

        let plans = [
            plan(temp.path(), "a.txt", "b.txt"),
            plan(temp.path(), "c.txt", "d.txt"),
        ];
        let stats = executor(false, FailurePolicy::Continue)
            .execute(&plans, &mut reporter(&buffer, false))
            .unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.renamed, 1);
        temp.child("a.txt").assert("a");
        temp.child("d.txt").assert("c");
    }

    #[test]
    fn test_dry_run_does_not_touch_the_filesystem() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        let buffer = SharedBuffer::default();

        let stats = executor(true, FailurePolicy::Abort)
            .execute(&[plan(temp.path(), "a.txt", "b.txt")], &mut reporter(&buffer, true))
            .unwrap();

        assert_eq!(stats.renamed, 1);
        temp.child("a.txt").assert("a");
        temp.child("b.txt").assert(predicates::path::missing());
        assert!(buffer.contents().starts_with("[DRY] [RENAMED] "));
        assert!(buffer.contents().contains("{+b+}"));
    }

    #[test]
    fn test_unchanged_names_are_skipped() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        let buffer = SharedBuffer::default();

        let stats = executor(false, FailurePolicy::Abort)
            .execute(&[plan(temp.path(), "a.txt", "a.txt")], &mut reporter(&buffer, false))
            .unwrap();

        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.renamed, 0);
        assert!(buffer.contents().starts_with("[UNCHANGED] "));
    }

    #[test]
    fn test_empty_new_name_is_refused() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        let buffer = SharedBuffer::default();

        let err = executor(false, FailurePolicy::Abort)
            .execute(&[plan(temp.path(), "a.txt", "")], &mut reporter(&buffer, false))
            .unwrap_err();

        assert!(err.is_rename());
        temp.child("a.txt").assert("a");
    }

    #[test]
    fn test_absolute_new_name_is_refused() {
        let temp = assert_fs::TempDir::new().unwrap();
        let elsewhere = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        let buffer = SharedBuffer::default();

        let target = elsewhere.path().join("a.txt");
        let err = executor(false, FailurePolicy::Abort)
            .execute(
                &[plan(temp.path(), "a.txt", &target.to_string_lossy())],
                &mut reporter(&buffer, false),
            )
            .unwrap_err();

        assert!(err.is_rename());
        assert!(err.to_string().contains("single path segment"));
        temp.child("a.txt").assert("a");
        elsewhere.child("a.txt").assert(predicates::path::missing());
    }

    #[test]
    fn test_nested_new_name_is_refused() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        temp.child("sub").create_dir_all().unwrap();
        let buffer = SharedBuffer::default();

        let plans = [
            plan(temp.path(), "a.txt", "sub/a.txt"),
            plan(temp.path(), "a.txt", "../a.txt"),
            plan(temp.path(), "a.txt", ".."),
            plan(temp.path(), "a.txt", "b.txt/"),
        ];
        let stats = executor(false, FailurePolicy::Continue)
            .execute(&plans, &mut reporter(&buffer, false))
            .unwrap();

        assert_eq!(stats.failed, 4);
        assert_eq!(stats.renamed, 0);
        temp.child("a.txt").assert("a");
        temp.child("sub/a.txt").assert(predicates::path::missing());
    }

    #[test]
    fn test_single_segment_names() {
        assert!(is_single_segment("b.txt"));
        assert!(is_single_segment(".hidden"));
        assert!(is_single_segment("..."));
        assert!(!is_single_segment("sub/b.txt"));
        assert!(!is_single_segment("/b.txt"));
        assert!(!is_single_segment("."));
        assert!(!is_single_segment(".."));
        assert!(!is_single_segment("./b.txt"));
        assert!(!is_single_segment("b.txt/"));
        assert!(!is_single_segment(""));
    }

    #[test]
    fn test_dry_run_reports_refused_plans_as_failed() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();
        temp.child("b.txt").write_str("b").unwrap();
        temp.child("c.txt").write_str("c").unwrap();
        let buffer = SharedBuffer::default();

        let plans = [
            plan(temp.path(), "a.txt", "b.txt"),
            plan(temp.path(), "b.txt", "sub/b.txt"),
            plan(temp.path(), "c.txt", "d.txt"),
        ];
        let stats = executor(true, FailurePolicy::Abort)
            .execute(&plans, &mut reporter(&buffer, true))
            .unwrap();

        assert_eq!(stats.failed, 2);
        assert_eq!(stats.renamed, 1);
        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("[DRY] [FAILED] "));
        assert!(lines[0].ends_with(": target already exists"));
        assert!(lines[1].starts_with("[DRY] [FAILED] "));
        assert!(lines[1].ends_with(": new name must be a single path segment"));
        assert!(lines[2].starts_with("[DRY] [RENAMED] "));
        temp.child("a.txt").assert("a");
        temp.child("b.txt").assert("b");
        temp.child("c.txt").assert("c");
    }
}
