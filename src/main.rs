use anyhow::Context;
use bulkren::{Config, FailurePolicy, Pipeline, RunSummary};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "bulkren",
    version,
    author,
    about = "Bulk rename files and directories with regular expressions",
    long_about = "Bulk rename files and directories with regular expressions.\n\n\
    FIND is tested against each node's base name and REPLACE computes the new \
    name. Both FIND and IGNORE are either a literal or a /pattern/flags regex \
    (flags: g i m s u). IGNORE is tested against the full path. Nodes are \
    renamed deepest first, so renaming a directory never breaks pending \
    renames inside it.\n\n\
    USAGE EXAMPLES:\n  \
      # Preview turning every .scss file into .css\n  \
      bulkren . '/(.+)\\.scss$/' '$1.css' -rn\n\n  \
      # Rename directories only, skipping anything under node_modules\n  \
      bulkren ./src '/^old-/' 'new-' '/node_modules/' -rd"
)]
struct Cli {
    /// Root directory to scan
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Pattern tested against each base name (literal or /pattern/flags)
    #[arg(value_name = "FIND")]
    find: String,

    /// Replacement for the matched text; $1..$n insert capture groups
    #[arg(value_name = "REPLACE")]
    replace: String,

    /// Pattern tested against full paths; matching nodes are skipped
    #[arg(value_name = "IGNORE")]
    ignore: Option<String>,

    /// Preview the renames without touching the filesystem
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Match files only
    #[arg(short, long)]
    files: bool,

    /// Match directories only
    #[arg(short, long)]
    dirs: bool,

    /// Suppress all output
    #[arg(short, long)]
    silent: bool,

    /// Continue with the remaining renames after a failure
    #[arg(short, long)]
    keep_going: bool,

    /// When to color the output
    #[arg(long, value_enum, default_value = "auto")]
    color: CliColor,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliColor {
    /// Color when standard output is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl CliColor {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version also arrive here
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_tracing(cli.verbose, cli.silent);
    if matches!(cli.color, CliColor::Always) {
        // colored drops styling off a terminal unless forced
        colored::control::set_override(true);
    }

    let silent = cli.silent;
    match run(cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            if !silent {
                eprintln!("Error: {} rename(s) failed", summary.failed);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            if !silent {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    // Neither or both type flags: match everything
    let (match_files, match_directories) = if cli.files == cli.dirs {
        (true, true)
    } else {
        (cli.files, cli.dirs)
    };

    let failure_policy = if cli.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let mut builder = Config::builder()
        .root_dir(cli.path)
        .find(cli.find)
        .replacement(cli.replace)
        .match_files(match_files)
        .match_directories(match_directories)
        .recursive(cli.recursive)
        .dry_run(cli.dry_run)
        .silent(cli.silent)
        .color(!cli.silent && cli.color.enabled())
        .failure_policy(failure_policy);

    if let Some(ignore) = cli.ignore {
        builder = builder.exclude(ignore);
    }

    let config = builder.build().context("Failed to build configuration")?;

    Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Rename failed")
}

fn setup_tracing(verbosity: u8, silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        match verbosity {
            0 => EnvFilter::new("bulkren=warn"),
            1 => EnvFilter::new("bulkren=info"),
            2 => EnvFilter::new("bulkren=debug"),
            _ => EnvFilter::new("bulkren=trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
