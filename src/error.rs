//! Error type for the oracle's own plumbing.
//!
//! [`OracleError`] covers everything that can go wrong *around* a check:
//! unreadable config, a malformed case file, I/O. Problems with the candidate
//! under test are never errors of this kind; they are
//! [`Violation`](stablecheck_core::Violation)s reported in a verdict.

use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Unified error type for oracle setup and I/O.
#[derive(Debug)]
pub enum OracleError {
    /// A configuration file could not be loaded, parsed, or validated.
    Config {
        /// Path to the configuration file, if known.
        path: Option<PathBuf>,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// A case file was not valid JSON or described an invalid instance.
    InvalidCase {
        /// Path to the case file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// An I/O error occurred reading input or writing output.
    Io(std::io::Error),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { path, detail } => {
                match path {
                    Some(path) => write!(f, "configuration error in '{}': {detail}", path.display())?,
                    None => write!(f, "configuration error: {detail}")?,
                }
                write!(f, "\n  To fix: edit the config file or the command-line flags.")
            }
            Self::InvalidCase { path, detail } => {
                write!(
                    f,
                    "invalid case file '{}': {detail}\n  To fix: the file must be JSON with \
                     `left` and `right` rankings plus a `matching` and/or `trace`.",
                    path.display()
                )
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OracleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for OracleError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            path: err.path,
            detail: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_keeps_path() {
        let err: OracleError = ConfigError {
            path: Some(PathBuf::from("stablecheck.toml")),
            message: "line 2: bad".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("'stablecheck.toml'"));
        assert!(msg.contains("line 2: bad"));
    }

    #[test]
    fn io_error_has_source() {
        let err = OracleError::from(std::io::Error::other("disk"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
