//! Report rendering: plain text for people, JSON for machines.

use std::fmt;

use anyhow::{Context as _, Result};
use serde::Serialize;
use stablecheck_core::Ranking;

use crate::oracle::{CandidateOutput, OracleReport, TrialFailure, Verdict};

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Render `data` in this format; text uses its `Display` impl.
    ///
    /// # Errors
    /// Fails only if JSON serialization fails.
    pub fn render<T: Serialize + fmt::Display>(self, data: &T) -> Result<String> {
        match self {
            Self::Text => Ok(data.to_string()),
            Self::Json => serde_json::to_string_pretty(data).context("JSON serialization failed"),
        }
    }
}

impl fmt::Display for OracleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            Verdict::Pass => write!(
                f,
                "{} oracle: {} PASS ({}/{} trials, size {}, seed {})",
                self.oracle,
                self.candidate,
                self.trials_run,
                self.trials_requested,
                self.size,
                self.seed
            ),
            Verdict::Fail(failure) => {
                writeln!(
                    f,
                    "{} oracle: {} FAIL at trial {} of {} (size {}, seed {}, trial seed {})",
                    self.oracle,
                    self.candidate,
                    failure.trial,
                    self.trials_requested,
                    self.size,
                    self.seed,
                    failure.trial_seed
                )?;
                write_failure(f, failure)?;
                write!(
                    f,
                    "  reproduce: stablecheck generate --size {} --seed {}",
                    self.size, failure.trial_seed
                )
            }
        }
    }
}

fn write_failure(f: &mut fmt::Formatter<'_>, failure: &TrialFailure) -> fmt::Result {
    writeln!(f, "  {}", failure.violation)?;
    write_rankings(f, "left", 'L', &failure.left)?;
    write_rankings(f, "right", 'R', &failure.right)?;
    match &failure.output {
        Some(CandidateOutput::Matching(matching)) => {
            write!(f, "  matching:")?;
            for pairing in matching {
                write!(f, " {pairing}")?;
            }
            writeln!(f)
        }
        Some(CandidateOutput::Trace(trace)) => {
            writeln!(f, "  trace ({} offers):", trace.len())?;
            for (index, offer) in trace.iter().enumerate() {
                writeln!(f, "    #{index}: {offer}")?;
            }
            Ok(())
        }
        None => writeln!(f, "  (no output)"),
    }
}

/// Write a preference table, one participant per line.
pub fn write_rankings(
    f: &mut impl fmt::Write,
    label: &str,
    prefix: char,
    rankings: &[Ranking],
) -> fmt::Result {
    writeln!(f, "  {label} rankings:")?;
    for (id, ranking) in rankings.iter().enumerate() {
        writeln!(f, "    {prefix}{id}: {ranking}")?;
    }
    Ok(())
}
