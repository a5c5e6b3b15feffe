use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the bulkren library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A required argument is missing or malformed.
    #[error("Invalid argument: {message}")]
    Argument {
        /// Detailed error message
        message: String,
    },

    /// A find, ignore or replacement pattern could not be parsed.
    #[error("Invalid pattern '{pattern}': {reason}")]
    PatternSyntax {
        /// The offending pattern as given by the user
        pattern: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// The root path cannot be resolved, does not exist or is not a directory.
    #[error("Invalid path '{path}': {message}")]
    Path {
        /// The offending path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Renaming a single node failed.
    #[error("Failed to rename '{from}' to '{to}': {message}")]
    Rename {
        /// Source path
        from: PathBuf,
        /// Target path
        to: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Writing to the output sink failed.
    #[error("Failed to write output: {message}")]
    Output {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an argument error.
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Creates a pattern syntax error.
    #[must_use]
    pub fn pattern_syntax(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PatternSyntax {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a path error.
    #[must_use]
    pub fn path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a rename error from the underlying failure message.
    #[must_use]
    pub fn rename(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an output error.
    #[must_use]
    pub fn output(source: &std::io::Error) -> Self {
        Self::Output {
            message: source.to_string(),
        }
    }

    /// Returns true if this is a pattern syntax error.
    #[must_use]
    pub const fn is_pattern_syntax(&self) -> bool {
        matches!(self, Self::PatternSyntax { .. })
    }

    /// Returns true if this is a path error.
    #[must_use]
    pub const fn is_path(&self) -> bool {
        matches!(self, Self::Path { .. })
    }

    /// Returns true if this is a rename error.
    #[must_use]
    pub const fn is_rename(&self) -> bool {
        matches!(self, Self::Rename { .. })
    }
}
