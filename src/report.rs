use crate::error::{Error, Result};
use crate::node::{RenamePlan, ScannedNode};
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
enum Label {
    Dry,
    Renamed,
    Excluded,
    Failed,
    Unchanged,
}

impl Label {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "[DRY]",
            Self::Renamed => "[RENAMED]",
            Self::Excluded => "[EXCLUDED]",
            Self::Failed => "[FAILED]",
            Self::Unchanged => "[UNCHANGED]",
        }
    }

    fn colored(self) -> ColoredString {
        let text = self.as_str();
        match self {
            Self::Dry => text.blue(),
            Self::Renamed => text.green(),
            Self::Excluded => text.yellow(),
            Self::Failed => text.red(),
            Self::Unchanged => text.dimmed(),
        }
    }
}

/// The output sink of a run.
///
/// Every status line of a run goes through one reporter owned by the
/// pipeline thread, so lines are never interleaved.
pub struct Reporter {
    out: Box<dyn Write + Send>,
    color: bool,
    dry_run: bool,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("color", &self.color)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Creates a reporter writing to `out`.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>, color: bool, dry_run: bool) -> Self {
        Self {
            out,
            color,
            dry_run,
        }
    }

    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout(color: bool, dry_run: bool) -> Self {
        Self::new(Box::new(io::stdout()), color, dry_run)
    }

    /// Creates a reporter that discards everything.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Box::new(io::sink()), false, false)
    }

    /// Reports a node dropped by the exclusion pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn excluded(&mut self, node: &ScannedNode) -> Result<()> {
        let payload = node.path().display().to_string();
        self.line(Label::Excluded, &payload)
    }

    /// Reports a rename that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn renamed(&mut self, plan: &RenamePlan) -> Result<()> {
        let payload = format!(
            "{} => {}",
            plan.path().display(),
            plan.new_path().display()
        );
        self.line(Label::Renamed, &payload)
    }

    /// Reports a rename that would be applied, rendered as a diff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn previewed(&mut self, rendered: &str) -> Result<()> {
        self.line(Label::Renamed, rendered)
    }

    /// Reports a plan whose name did not change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn unchanged(&mut self, plan: &RenamePlan) -> Result<()> {
        let payload = plan.path().display().to_string();
        self.line(Label::Unchanged, &payload)
    }

    /// Reports a failed rename with its cause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn failed(&mut self, plan: &RenamePlan, cause: &str) -> Result<()> {
        let payload = format!(
            "{} => {}: {}",
            plan.path().display(),
            plan.new_path().display(),
            cause
        );
        self.line(Label::Failed, &payload)
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| Error::output(&e))
    }

    fn line(&mut self, label: Label, payload: &str) -> Result<()> {
        let mut line = String::new();
        if self.dry_run {
            line.push_str(&self.label(Label::Dry));
            line.push(' ');
        }
        line.push_str(&self.label(label));
        line.push(' ');
        line.push_str(payload);

        writeln!(self.out, "{line}").map_err(|e| Error::output(&e))
    }

    fn label(&self, label: Label) -> String {
        if self.color {
            label.colored().to_string()
        } else {
            label.as_str().to_string()
        }
    }
}
