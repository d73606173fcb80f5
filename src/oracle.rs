//! Oracle drivers: the randomized trial loops.
//!
//! Both drivers share one loop: derive a per-trial seed from the master
//! seed, generate an instance, call the candidate, run a checker, stop at
//! the first violation. They differ only in which candidate contract they
//! call and which checker they run.
//!
//! | Driver | Candidate contract | Checker |
//! |--------|--------------------|---------|
//! | [`run_result_oracle`] | [`MatchingAlgorithm`] | [`check_matching`] |
//! | [`run_trace_oracle`] | [`InstrumentedAlgorithm`] | [`check_trace`] |
//!
//! # Reproduction
//!
//! Every trial is generated from its own `trial_seed`, drawn in sequence
//! from a `StdRng` seeded with the master seed. A failure records both the
//! trial seed and the full rankings, so `Instance::random` with
//! `StdRng::seed_from_u64(trial_seed)` rebuilds the failing instance.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};
use serde::Serialize;
use stablecheck_core::{
    GenerationError, Instance, Offer, Pairing, Ranking, Violation, check_matching, check_trace,
    generate_rankings,
};

use crate::candidate::{InstrumentedAlgorithm, MatchingAlgorithm, invoke};
use crate::config::OracleConfig;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Which driver produced a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// Checks final matchings for stability.
    Result,
    /// Checks proposal traces for greedy fidelity.
    Trace,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Result => write!(f, "result"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// What the candidate returned on the failing trial, if anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOutput {
    /// A matching from the result contract.
    Matching(Vec<Pairing>),
    /// An offer trace from the instrumented contract.
    Trace(Vec<Offer>),
}

/// Everything needed to understand and replay a failing trial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrialFailure {
    /// Zero-based trial index.
    pub trial: usize,
    /// Seed the trial's instance was generated from.
    pub trial_seed: u64,
    /// Left rankings of the failing instance.
    pub left: Vec<Ranking>,
    /// Right rankings of the failing instance.
    pub right: Vec<Ranking>,
    /// The candidate's output, absent if it errored or panicked.
    pub output: Option<CandidateOutput>,
    /// The first violation found.
    pub violation: Violation,
}

impl TrialFailure {
    /// Rebuild the failing instance.
    ///
    /// # Errors
    /// Returns the [`GenerationError`] if the failure was itself a
    /// generation failure.
    pub fn instance(&self) -> Result<Instance, GenerationError> {
        Instance::new(self.left.clone(), self.right.clone())
    }
}

/// Outcome of a driver invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Every trial passed.
    Pass,
    /// A trial failed; no further trials were run.
    Fail(Box<TrialFailure>),
}

/// Summary of one driver invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OracleReport {
    /// Which driver ran.
    pub oracle: OracleKind,
    /// Candidate name.
    pub candidate: String,
    /// Master seed (drawn from the OS if the config had none).
    pub seed: u64,
    /// Participants per side.
    pub size: usize,
    /// Trials requested by the config.
    pub trials_requested: usize,
    /// Trials actually run, including a failing one.
    pub trials_run: usize,
    /// Pass, or the first failure.
    pub verdict: Verdict,
}

impl OracleReport {
    /// Whether every trial passed.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    /// The failing trial, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&TrialFailure> {
        match &self.verdict {
            Verdict::Pass => None,
            Verdict::Fail(failure) => Some(failure),
        }
    }

    /// The first violation, if any.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        self.failure().map(|f| &f.violation)
    }

    /// Convert into a `Result`, keeping the report on success.
    ///
    /// # Errors
    /// Returns an error whose message is the full text report when a trial
    /// failed.
    pub fn into_result(self) -> anyhow::Result<Self> {
        if self.is_pass() {
            Ok(self)
        } else {
            Err(anyhow::anyhow!("{self}"))
        }
    }

    /// Panic with the full text report unless every trial passed.
    ///
    /// For use from test suites of candidate implementations.
    #[track_caller]
    pub fn assert_pass(&self) {
        assert!(self.is_pass(), "{self}");
    }
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

/// Infinite stream of per-trial seeds derived from a master seed.
pub struct TrialSeeds {
    rng: StdRng,
}

impl TrialSeeds {
    /// Seed stream for `master_seed`.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(master_seed),
        }
    }
}

impl Iterator for TrialSeeds {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.rng.random())
    }
}

/// Generate the instance a trial seed stands for, returning the raw rankings
/// alongside the validation result.
fn trial_instance(
    trial_seed: u64,
    size: usize,
) -> (Vec<Ranking>, Vec<Ranking>, Result<Instance, GenerationError>) {
    let mut rng = StdRng::seed_from_u64(trial_seed);
    let left = generate_rankings(&mut rng, size);
    let right = generate_rankings(&mut rng, size);
    let instance = Instance::new(left.clone(), right.clone());
    (left, right, instance)
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// A single trial's failure before it is tagged with trial metadata.
type TrialError = (Option<CandidateOutput>, Violation);

/// Run the result oracle: check `candidate`'s matchings for completeness,
/// validity, and stability.
#[must_use]
pub fn run_result_oracle<C>(config: &OracleConfig, candidate: &C) -> OracleReport
where
    C: MatchingAlgorithm + ?Sized,
{
    drive(OracleKind::Result, config, candidate.name(), |instance| {
        let matching = invoke(|| candidate.matching(instance.left(), instance.right()))
            .map_err(|e| -> TrialError { (None, Violation::Contract(e)) })?;
        check_matching(instance, &matching).map_err(|e| -> TrialError {
            (Some(CandidateOutput::Matching(matching)), Violation::Stability(e))
        })
    })
}

/// Run the trace oracle: check `candidate`'s proposal traces for greedy
/// fidelity.
#[must_use]
pub fn run_trace_oracle<C>(config: &OracleConfig, candidate: &C) -> OracleReport
where
    C: InstrumentedAlgorithm + ?Sized,
{
    drive(OracleKind::Trace, config, candidate.name(), |instance| {
        let run = invoke(|| candidate.run(instance.left(), instance.right()))
            .map_err(|e| -> TrialError { (None, Violation::Contract(e)) })?;
        check_trace(instance, &run.trace).map_err(|e| -> TrialError {
            (Some(CandidateOutput::Trace(run.trace)), Violation::Trace(e))
        })
    })
}

fn drive(
    oracle: OracleKind,
    config: &OracleConfig,
    candidate: &str,
    mut trial_check: impl FnMut(&Instance) -> Result<(), TrialError>,
) -> OracleReport {
    let seed = config.seed.unwrap_or_else(rand::random);
    let size = config.size;
    let _span = tracing::info_span!("oracle", %oracle, candidate, seed, size).entered();

    let mut trials_run = 0;
    let mut verdict = Verdict::Pass;

    for (trial, trial_seed) in TrialSeeds::new(seed).take(config.trials).enumerate() {
        let _trial_span = tracing::debug_span!("trial", trial, trial_seed).entered();
        trials_run += 1;

        let (left, right, instance) = trial_instance(trial_seed, size);
        let outcome = match instance {
            Ok(instance) => trial_check(&instance),
            Err(e) => Err((None, Violation::Generation(e))),
        };

        match outcome {
            Ok(()) => tracing::debug!("trial passed"),
            Err((output, violation)) => {
                tracing::warn!(
                    category = violation.category(),
                    %violation,
                    "trial failed"
                );
                verdict = Verdict::Fail(Box::new(TrialFailure {
                    trial,
                    trial_seed,
                    left,
                    right,
                    output,
                    violation,
                }));
                break;
            }
        }
    }

    let report = OracleReport {
        oracle,
        candidate: candidate.to_owned(),
        seed,
        size,
        trials_requested: config.trials,
        trials_run,
        verdict,
    };
    tracing::info!(pass = report.is_pass(), trials_run, "oracle finished");
    report
}

#[cfg(test)]
mod tests {
    use stablecheck_core::{ContractViolation, StabilityViolation, TraceViolation};

    use super::*;
    use crate::reference::Builtin;

    fn config() -> OracleConfig {
        OracleConfig::new(25, 6).with_seed(99)
    }

    #[test]
    fn trial_seeds_are_deterministic() {
        let a: Vec<u64> = TrialSeeds::new(5).take(4).collect();
        let b: Vec<u64> = TrialSeeds::new(5).take(4).collect();
        assert_eq!(a, b);
        assert_ne!(a, TrialSeeds::new(6).take(4).collect::<Vec<_>>());
    }

    #[test]
    fn trial_instance_matches_instance_random() {
        let (_, _, inst) = trial_instance(1234, 7);
        let again = Instance::random(&mut StdRng::seed_from_u64(1234), 7).unwrap();
        assert_eq!(inst.unwrap(), again);
    }

    #[test]
    fn reference_passes_both_oracles() {
        let report = run_result_oracle(&config(), &Builtin::GaleShapley);
        report.assert_pass();
        assert_eq!(report.trials_run, 25);
        assert_eq!(report.seed, 99);

        run_trace_oracle(&config(), &Builtin::GaleShapleyRight).assert_pass();
    }

    #[test]
    fn drop_last_fails_on_first_trial_with_incomplete() {
        let report = run_result_oracle(&config(), &Builtin::DropLast);
        let failure = report.failure().unwrap();
        assert_eq!(failure.trial, 0);
        assert_eq!(report.trials_run, 1);
        assert_eq!(
            failure.violation,
            Violation::Stability(StabilityViolation::Incomplete {
                expected: 6,
                actual: 5,
            })
        );
        assert!(matches!(failure.output, Some(CandidateOutput::Matching(ref m)) if m.len() == 5));
    }

    #[test]
    fn panicking_candidate_is_a_contract_violation() {
        let report = run_trace_oracle(&config(), &Builtin::Panicking);
        let failure = report.failure().unwrap();
        assert!(matches!(
            failure.violation,
            Violation::Contract(ContractViolation::Panicked { .. })
        ));
        assert_eq!(failure.output, None);
        assert_eq!(failure.left.len(), 6);
    }

    #[test]
    fn skip_first_choice_is_out_of_order_at_offer_zero() {
        let report = run_trace_oracle(&config(), &Builtin::SkipFirstChoice);
        assert!(matches!(
            report.violation(),
            Some(Violation::Trace(TraceViolation::OutOfOrder { index: 0, .. }))
        ));
    }

    #[test]
    fn failure_instance_rebuilds() {
        let report = run_result_oracle(&config(), &Builtin::Identity);
        if let Some(failure) = report.failure() {
            let inst = failure.instance().unwrap();
            assert_eq!(inst.size(), 6);
            assert_eq!(
                inst,
                Instance::random(&mut StdRng::seed_from_u64(failure.trial_seed), 6).unwrap()
            );
        }
    }

    #[test]
    fn into_result_carries_text_report() {
        let err = run_result_oracle(&config(), &Builtin::Erroring)
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("always fails"));
    }

    #[test]
    fn size_zero_trivially_passes() {
        let cfg = OracleConfig::new(3, 0).with_seed(1);
        run_result_oracle(&cfg, &Builtin::GaleShapley).assert_pass();
        run_trace_oracle(&cfg, &Builtin::GaleShapley).assert_pass();
    }
}
