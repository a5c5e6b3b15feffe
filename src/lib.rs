//! # bulkren
//!
//! Bulk rename files and directories with regular expressions.
//!
//! ## Features
//!
//! - Parallel directory scanning, shallow or recursive
//! - `/pattern/flags` find and ignore patterns with `$1` capture references
//! - Deepest-first ordering, so renaming a directory never invalidates
//!   pending renames inside it
//! - Dry run with a character-level diff preview
//!
//! ## Quick Start
//!
//! ```no_run
//! use bulkren::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./styles")
//!     .find(r"/(.+)\.scss$/")
//!     .replacement("$1.css")
//!     .recursive(true)
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Scanner**: Lists nodes below the root with their type
//! 2. **Filter**: Keeps nodes matching the type, find and ignore rules
//! 3. **Planner**: Sorts candidates deepest-first and computes new names
//! 4. **Executor**: Renames one node at a time, or previews in dry run

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod executor;
mod filter;
mod node;
mod pattern;
mod pipeline;
mod planner;
mod preview;
mod report;
mod scanner;

pub use config::{Config, ConfigBuilder, FailurePolicy};
pub use error::{Error, Result};
pub use executor::{ExecutionStats, RenameExecutor};
pub use filter::{FilterOutcome, NodeFilter};
pub use node::{CandidateNode, NodeKind, RenamePlan, ScannedNode};
pub use pattern::{Flags, Pattern, PatternSpec, Template};
pub use pipeline::{Pipeline, RunSummary};
pub use planner::RenamePlanner;
pub use preview::{NameDiff, PreviewRenderer, Segment, SegmentKind};
pub use report::Reporter;

/// Runs the complete rename pipeline with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Root directory doesn't exist or is inaccessible
/// - A rename fails and the failure policy is [`FailurePolicy::Abort`]
/// - Output cannot be written
///
/// # Examples
///
/// ```no_run
/// use bulkren::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir(".")
///     .find("/draft-/")
///     .replacement("final-")
///     .dry_run(true)
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<RunSummary> {
    Pipeline::new(config)?.run()
}
