//! Checking a single externally produced case.
//!
//! A case file is JSON with the instance's `left` and `right` rankings and
//! the output of some implementation under test: a `matching`, a `trace`,
//! or both. This lets implementations outside Rust be checked by writing
//! their output to disk.
//!
//! ```json
//! {
//!   "left":  [[0, 1], [1, 0]],
//!   "right": [[0, 1], [1, 0]],
//!   "matching": [{ "left": 0, "right": 0 }, { "left": 1, "right": 1 }],
//!   "trace": [{ "from": 0, "to": 0, "from_left": true }]
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stablecheck_core::{
    Instance, Offer, Pairing, Ranking, StabilityViolation, TraceViolation, check_matching,
    check_trace,
};

use crate::error::OracleError;
use crate::format::write_rankings;

/// Wire form of a case file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseFile {
    left: Vec<Ranking>,
    right: Vec<Ranking>,
    #[serde(default)]
    matching: Option<Vec<Pairing>>,
    #[serde(default)]
    trace: Option<Vec<Offer>>,
}

/// A validated case: an instance plus at least one output to check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    /// The instance the output was computed for.
    pub instance: Instance,
    /// Matching to run the stability checker on.
    pub matching: Option<Vec<Pairing>>,
    /// Trace to run the fidelity checker on.
    pub trace: Option<Vec<Offer>>,
}

impl Case {
    /// Read and validate a case file.
    ///
    /// # Errors
    /// Returns [`OracleError::Io`] if the file cannot be read and
    /// [`OracleError::InvalidCase`] if it is not a valid case.
    pub fn load(path: &Path) -> Result<Self, OracleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|detail| OracleError::InvalidCase {
            path: path.to_owned(),
            detail,
        })
    }

    /// Parse and validate a case from JSON text.
    ///
    /// # Errors
    /// Returns a description of the problem: bad JSON, an invalid instance,
    /// or neither `matching` nor `trace` present.
    pub fn parse(json: &str) -> Result<Self, String> {
        let raw: CaseFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if raw.matching.is_none() && raw.trace.is_none() {
            return Err("case has neither `matching` nor `trace`".to_owned());
        }
        let instance = Instance::new(raw.left, raw.right).map_err(|e| e.to_string())?;
        Ok(Self {
            instance,
            matching: raw.matching,
            trace: raw.trace,
        })
    }

    /// Run every applicable checker.
    #[must_use]
    pub fn check(&self) -> CaseReport {
        CaseReport {
            size: self.instance.size(),
            left: self.instance.left().to_vec(),
            right: self.instance.right().to_vec(),
            matching: self
                .matching
                .as_ref()
                .map(|m| CheckOutcome::from(check_matching(&self.instance, m))),
            trace: self
                .trace
                .as_ref()
                .map(|t| CheckOutcome::from(check_trace(&self.instance, t))),
        }
    }
}

/// Result of one checker on a case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "violation", rename_all = "snake_case")]
pub enum CheckOutcome<V> {
    /// The check passed.
    Pass,
    /// The check failed.
    Fail(V),
}

impl<V> CheckOutcome<V> {
    /// Whether the check passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl<V> From<Result<(), V>> for CheckOutcome<V> {
    fn from(result: Result<(), V>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(v) => Self::Fail(v),
        }
    }
}

impl<V: fmt::Display> fmt::Display for CheckOutcome<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail(v) => write!(f, "FAIL: {v}"),
        }
    }
}

/// Verdicts for one case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// Participants per side.
    pub size: usize,
    /// Left rankings, echoed for context.
    pub left: Vec<Ranking>,
    /// Right rankings, echoed for context.
    pub right: Vec<Ranking>,
    /// Stability checker outcome, if a matching was given.
    pub matching: Option<CheckOutcome<StabilityViolation>>,
    /// Fidelity checker outcome, if a trace was given.
    pub trace: Option<CheckOutcome<TraceViolation>>,
}

impl CaseReport {
    /// Whether every check that ran passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.matching.as_ref().is_none_or(CheckOutcome::is_pass)
            && self.trace.as_ref().is_none_or(CheckOutcome::is_pass)
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_pass() { "PASS" } else { "FAIL" };
        writeln!(f, "case (size {}): {verdict}", self.size)?;
        if let Some(outcome) = &self.matching {
            writeln!(f, "  matching: {outcome}")?;
        }
        if let Some(outcome) = &self.trace {
            writeln!(f, "  trace: {outcome}")?;
        }
        if !self.is_pass() {
            write_rankings(f, "left", 'L', &self.left)?;
            write_rankings(f, "right", 'R', &self.right)?;
        }
        Ok(())
    }
}
