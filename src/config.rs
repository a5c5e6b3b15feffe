use crate::error::{Error, Result};
use crate::pattern::{Pattern, Template};
use std::path::{Path, PathBuf};

/// What the executor does after a rename fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and return the error. Later plans may assume the failed
    /// rename happened.
    #[default]
    Abort,
    /// Report the failure and carry on with the remaining plans.
    Continue,
}

/// Configuration for a rename run.
///
/// Use [`Config::builder()`] to construct a new configuration. Patterns are
/// compiled and the root is resolved when the configuration is built; the
/// result is never mutated afterwards.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Absolute root directory to scan
    pub root_dir: PathBuf,

    /// Pattern tested against each node's base name
    pub find: Pattern,

    /// Pattern tested against each node's full path; matches are skipped
    pub exclude: Option<Pattern>,

    /// Replacement template applied to matched names
    pub replacement: Template,

    /// Rename regular files
    pub match_files: bool,

    /// Rename directories
    pub match_directories: bool,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Dry run mode (preview only, no renames)
    pub dry_run: bool,

    /// Suppress all output
    pub silent: bool,

    /// Colorize report output
    pub color: bool,

    /// Behaviour after a failed rename
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bulkren::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir("./assets")
    ///     .find(r"/(.+)\.scss$/")
    ///     .replacement("$1.css")
    ///     .recursive(true)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if the root directory doesn't exist or is not a
    /// directory, and [`Error::Argument`] if no node type is selected.
    pub fn validate(&self) -> Result<()> {
        validate_root(&self.root_dir)?;

        if !self.match_files && !self.match_directories {
            return Err(Error::argument(
                "at least one of files or directories must be matched",
            ));
        }

        Ok(())
    }
}

fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::path(root, "root directory does not exist"));
    }

    if !root.is_dir() {
        return Err(Error::path(root, "root path is not a directory"));
    }

    Ok(())
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    find: Option<String>,
    exclude: Option<String>,
    replacement: Option<String>,
    match_files: Option<bool>,
    match_directories: Option<bool>,
    recursive: bool,
    dry_run: bool,
    silent: bool,
    color: bool,
    failure_policy: FailurePolicy,
}

impl ConfigBuilder {
    /// Sets the root directory to scan.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the find pattern (`/pattern/flags` or a bare literal).
    #[must_use]
    pub fn find(mut self, pattern: impl Into<String>) -> Self {
        self.find = Some(pattern.into());
        self
    }

    /// Sets the exclusion pattern, tested against full paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    /// Sets the replacement template.
    #[must_use]
    pub fn replacement(mut self, template: impl Into<String>) -> Self {
        self.replacement = Some(template.into());
        self
    }

    /// Enables or disables renaming of files. Enabled by default.
    #[must_use]
    pub fn match_files(mut self, enabled: bool) -> Self {
        self.match_files = Some(enabled);
        self
    }

    /// Enables or disables renaming of directories. Enabled by default.
    #[must_use]
    pub fn match_directories(mut self, enabled: bool) -> Self {
        self.match_directories = Some(enabled);
        self
    }

    /// Enables recursive scanning.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    /// Enables dry run mode (no renames).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Suppresses all output.
    #[must_use]
    pub fn silent(mut self, enabled: bool) -> Self {
        self.silent = enabled;
        self
    }

    /// Enables colored output.
    #[must_use]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the behaviour after a failed rename.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The find pattern or replacement is missing
    /// - A pattern or the template fails to parse
    /// - The root cannot be resolved, doesn't exist or is not a directory
    pub fn build(self) -> Result<Config> {
        let find = self
            .find
            .ok_or_else(|| Error::argument("a find pattern is required"))?;
        let replacement = self
            .replacement
            .ok_or_else(|| Error::argument("a replacement is required"))?;

        let find = Pattern::new(&find)?;
        let exclude = self.exclude.as_deref().map(Pattern::new).transpose()?;
        let replacement = Template::parse(&replacement)?;

        let root = self.root_dir.unwrap_or_else(|| PathBuf::from("."));
        let root_dir = std::path::absolute(&root).map_err(|e| Error::path(&root, e.to_string()))?;

        let config = Config {
            root_dir,
            find,
            exclude,
            replacement,
            match_files: self.match_files.unwrap_or(true),
            match_directories: self.match_directories.unwrap_or(true),
            recursive: self.recursive,
            dry_run: self.dry_run,
            silent: self.silent,
            color: self.color,
            failure_policy: self.failure_policy,
        };

        config.validate()?;
        Ok(config)
    }
}
