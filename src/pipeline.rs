use crate::{
    config::Config,
    error::Result,
    executor::RenameExecutor,
    filter::NodeFilter,
    planner::RenamePlanner,
    report::Reporter,
    scanner::Scanner,
};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Statistics collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Nodes found by the scanner
    pub scanned: usize,

    /// Nodes that passed all filters
    pub candidates: usize,

    /// Matching nodes dropped by the exclusion pattern
    pub excluded: usize,

    /// Nodes renamed (or that would be renamed in dry run)
    pub renamed: usize,

    /// Candidates whose new name equals the old one
    pub unchanged: usize,

    /// Renames that failed
    pub failed: usize,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Time spent scanning
    pub scan_duration: Duration,

    /// Total execution time
    pub duration: Duration,
}

impl RunSummary {
    /// Returns true if every attempted rename succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs scan, filter, plan and execute in sequence.
pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    filter: NodeFilter,
    planner: RenamePlanner,
    executor: RenameExecutor,
    reporter: Reporter,
}

impl Pipeline {
    /// Creates a pipeline reporting to stdout, or nowhere when the
    /// configuration is silent.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let reporter = if config.silent {
            Reporter::silent()
        } else {
            Reporter::stdout(config.color, config.dry_run)
        };

        Ok(Self {
            scanner: Scanner::new(&config),
            filter: NodeFilter::new(&config),
            planner: RenamePlanner::new(&config),
            executor: RenameExecutor::new(&config),
            reporter,
            config,
        })
    }

    /// Replaces the output sink. Ignored when the configuration is silent.
    #[must_use]
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        if !self.config.silent {
            self.reporter = Reporter::new(out, self.config.color, self.config.dry_run);
        }
        self
    }

    /// Executes the pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Scan**: lists nodes below the root
    /// 2. **Filter**: keeps nodes matching type, find and exclusion rules
    /// 3. **Plan**: orders candidates deepest-first and computes new names
    /// 4. **Execute**: renames (or previews) one node at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be scanned, output cannot be
    /// written, or a rename fails under [`crate::FailurePolicy::Abort`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bulkren::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir("./assets")
    ///     .find(r"/(.+)\.scss$/")
    ///     .replacement("$1.css")
    ///     .dry_run(true)
    ///     .build()?;
    ///
    /// let summary = Pipeline::new(config)?.run()?;
    /// println!("{} nodes would be renamed", summary.renamed);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(mut self) -> Result<RunSummary> {
        let start_time = Instant::now();

        debug!("Stage 1/4: Scanning...");
        let nodes = self.scanner.scan()?;
        let scan_duration = start_time.elapsed();
        let scanned = nodes.len();
        debug!("Scanned {} nodes in {:.2}s", scanned, scan_duration.as_secs_f64());

        debug!("Stage 2/4: Filtering {} nodes...", scanned);
        let outcome = self.filter.apply(nodes);
        for node in &outcome.excluded {
            self.reporter.excluded(node)?;
        }
        let excluded = outcome.excluded.len();
        let candidates = outcome.candidates.len();

        debug!(
            "Stage 3/4: Planning {} renames ({} => {})...",
            candidates,
            self.config.find.as_str(),
            self.config.replacement.as_str()
        );
        let plans = self.planner.plan(outcome.candidates);

        debug!("Stage 4/4: Executing...");
        let result = self.executor.execute(&plans, &mut self.reporter);
        self.reporter.flush()?;
        let stats = result?;

        let summary = RunSummary {
            scanned,
            candidates,
            excluded,
            renamed: stats.renamed,
            unchanged: stats.unchanged,
            failed: stats.failed,
            dry_run: self.config.dry_run,
            scan_duration,
            duration: start_time.elapsed(),
        };

        info!(
            "{} {} of {} candidates ({} excluded, {} unchanged, {} failed) in {:.2}s (scan {:.2}s)",
            if summary.dry_run { "Would rename" } else { "Renamed" },
            summary.renamed,
            summary.candidates,
            summary.excluded,
            summary.unchanged,
            summary.failed,
            summary.duration.as_secs_f64(),
            summary.scan_duration.as_secs_f64()
        );

        Ok(summary)
    }
}
