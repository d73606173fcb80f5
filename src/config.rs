//! Oracle configuration (`stablecheck.toml`).
//!
//! Defines the typed configuration for oracle runs: how many trials, how
//! large each instance is, and the master seed. Every field is optional in
//! the file; command-line flags override whatever the file says.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stablecheck.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration file.
///
/// Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Trial-loop settings shared by both oracles.
    #[serde(default)]
    pub oracle: OracleConfig,
}

// ---------------------------------------------------------------------------
// OracleConfig
// ---------------------------------------------------------------------------

/// Settings for one oracle driver invocation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OracleConfig {
    /// Number of randomized trials (default: 200).
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Participants per side in each instance (default: 12).
    #[serde(default = "default_size")]
    pub size: usize,

    /// Master seed. When unset a seed is drawn from the OS per run and
    /// recorded in the report.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            size: default_size(),
            seed: None,
        }
    }
}

const fn default_trials() -> usize {
    200
}

const fn default_size() -> usize {
    12
}

impl OracleConfig {
    /// A config with explicit trial count and size and no fixed seed.
    #[must_use]
    pub const fn new(trials: usize, size: usize) -> Self {
        Self {
            trials,
            size,
            seed: None,
        }
    }

    /// Pin the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace fields for which an override is given.
    #[must_use]
    pub fn overridden(
        mut self,
        trials: Option<usize>,
        size: Option<usize>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(trials) = trials {
            self.trials = trials;
        }
        if let Some(size) = size {
            self.size = size;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Reject settings that cannot produce a meaningful run.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `trials` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError {
                path: None,
                message: "oracle.trials must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading or parsing a configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - If the file does not exist, returns all defaults (not an error).
    /// - If the file exists but contains invalid TOML, unknown fields, or
    ///   invalid values, returns a [`ConfigError`].
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found), parse
    /// errors, or failed validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML, unknown fields, or values that
    /// fail [`OracleConfig::validate`].
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })?;
        config.oracle.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = OracleConfig::default();
        assert_eq!(cfg.trials, 200);
        assert_eq!(cfg.size, 12);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn parse_empty_string() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r"
[oracle]
trials = 50
size = 8
seed = 1234
";
        let cfg = Config::parse(toml).unwrap();
        assert_eq!(cfg.oracle, OracleConfig::new(50, 8).with_seed(1234));
    }

    #[test]
    fn parse_partial_config_keeps_defaults() {
        let cfg = Config::parse("[oracle]\nsize = 5\n").unwrap();
        assert_eq!(cfg.oracle.trials, 200);
        assert_eq!(cfg.oracle.size, 5);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = Config::parse("[oracle]\ntrials = 3\nworkers = 4\n").unwrap_err();
        assert!(err.message.contains("unknown field"), "got: {}", err.message);
        assert!(err.message.contains("workers"), "got: {}", err.message);
    }

    #[test]
    fn zero_trials_rejected() {
        let err = Config::parse("[oracle]\ntrials = 0\n").unwrap_err();
        assert!(err.message.contains("at least 1"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let cfg = OracleConfig::new(10, 4)
            .with_seed(1)
            .overridden(None, Some(6), None);
        assert_eq!(cfg, OracleConfig::new(10, 6).with_seed(1));

        let cfg = cfg.overridden(Some(3), None, Some(9));
        assert_eq!(cfg, OracleConfig::new(3, 6).with_seed(9));
    }

    #[test]
    fn load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[oracle]\ntrials = \"many\"\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }
}
