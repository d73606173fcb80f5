//! Oracle drivers against the bundled candidates and hand-written closures.
//!
//! The reference implementation must pass both oracles at the default
//! settings (200 trials of size 12); each broken candidate must be caught
//! with the right kind of violation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use stablecheck::candidate::{MatchingAlgorithm as _, Named};
use stablecheck::oracle::{CandidateOutput, TrialSeeds};
use stablecheck::reference::{Builtin, deferred_acceptance};
use stablecheck::{OracleConfig, OracleKind, run_result_oracle, run_trace_oracle};
use stablecheck_core::{
    ContractViolation, Instance, Offer, Pairing, Ranking, Run, Side, StabilityViolation,
    TraceViolation, Violation, check_matching,
};

const SEED: u64 = 0x5eed_2026;

fn defaults() -> OracleConfig {
    OracleConfig::default().with_seed(SEED)
}

/// Whether some left/right pair strictly prefer each other to their partners,
/// checked pair by pair from the raw rankings.
fn has_blocking_pair(inst: &Instance, matching: &[Pairing]) -> bool {
    let rank = |ranking: &Ranking, id: usize| ranking.iter().position(|x| x == id);
    matching.iter().any(|a| {
        matching.iter().any(|b| {
            let left = &inst.left()[a.left];
            let right = &inst.right()[b.right];
            a.left != b.left
                && rank(left, b.right) < rank(left, a.right)
                && rank(right, a.left) < rank(right, b.left)
        })
    })
}

#[test]
fn reference_passes_result_oracle_at_defaults() {
    for candidate in [Builtin::GaleShapley, Builtin::GaleShapleyRight] {
        let report = run_result_oracle(&defaults(), &candidate);
        report.assert_pass();
        assert_eq!(report.oracle, OracleKind::Result);
        assert_eq!(report.trials_run, 200);
        assert_eq!(report.size, 12);
    }
}

#[test]
fn reference_passes_trace_oracle_at_defaults() {
    for candidate in [Builtin::GaleShapley, Builtin::GaleShapleyRight] {
        let report = run_trace_oracle(&defaults(), &candidate);
        report.assert_pass();
        assert_eq!(report.trials_run, 200);
    }
}

#[test]
fn swapped_pairings_fail_on_first_blocked_trial() {
    let report = run_result_oracle(&defaults(), &Builtin::SwapPartners);
    let failure = report.failure().expect("swapping partners should be caught");
    assert!(
        matches!(
            failure.violation,
            Violation::Stability(StabilityViolation::BlockingPair { .. })
        ),
        "unexpected violation: {}",
        failure.violation
    );

    // Replay every trial up to the failure: earlier trials must have been
    // unblocked by the swap, the failing one blocked.
    for (trial, trial_seed) in TrialSeeds::new(SEED).take(failure.trial + 1).enumerate() {
        let inst = Instance::random(&mut StdRng::seed_from_u64(trial_seed), 12).unwrap();
        let m = Builtin::SwapPartners.matching(inst.left(), inst.right()).unwrap();
        let blocked = has_blocking_pair(&inst, &m);
        assert_eq!(blocked, trial == failure.trial, "trial {trial}");
    }
    assert_eq!(report.trials_run, failure.trial + 1);
}

#[test]
fn failure_preserves_reproducible_instance() {
    let report = run_result_oracle(&defaults(), &Builtin::Identity);
    let failure = report.failure().expect("identity matching should be unstable");
    let inst = failure.instance().unwrap();
    assert_eq!(
        inst,
        Instance::random(&mut StdRng::seed_from_u64(failure.trial_seed), 12).unwrap()
    );
    let Some(CandidateOutput::Matching(matching)) = &failure.output else {
        panic!("expected the identity matching in the report");
    };
    assert_eq!(check_matching(&inst, matching), Err(match &failure.violation {
        Violation::Stability(v) => v.clone(),
        other => panic!("unexpected violation {other}"),
    }));
}

#[test]
fn repeated_offer_is_caught_at_index_one() {
    let report = run_trace_oracle(&defaults(), &Builtin::RepeatOffer);
    let failure = report.failure().unwrap();
    assert_eq!(failure.trial, 0);
    assert!(matches!(
        failure.violation,
        Violation::Trace(TraceViolation::RepeatedOffer {
            index: 1,
            first_index: 0,
            ..
        })
    ));
}

#[test]
fn erroring_and_panicking_candidates_are_contract_violations() {
    let errored = run_result_oracle(&defaults(), &Builtin::Erroring);
    assert!(matches!(
        errored.violation(),
        Some(Violation::Contract(ContractViolation::Errored { .. }))
    ));

    let panicked = run_result_oracle(&defaults(), &Builtin::Panicking);
    assert!(matches!(
        panicked.violation(),
        Some(Violation::Contract(ContractViolation::Panicked { .. }))
    ));
    let failure = panicked.failure().unwrap();
    assert_eq!(failure.left.len(), 12);
    assert_eq!(failure.right.len(), 12);
}

#[test]
fn closure_candidate_with_out_of_range_id() {
    let off_by_one = Named::new(
        "off-by-one",
        |left: &[Ranking], _right: &[Ranking]| -> anyhow::Result<Vec<Pairing>> {
            Ok((0..left.len()).map(|i| Pairing::new(i, i + 1)).collect())
        },
    );
    let report = run_result_oracle(&OracleConfig::new(5, 4).with_seed(1), &off_by_one);
    assert_eq!(report.candidate, "off-by-one");
    assert!(matches!(
        report.violation(),
        Some(Violation::Stability(StabilityViolation::OutOfRange {
            index: 3,
            side: Side::Right,
            size: 4,
            ..
        }))
    ));
}

#[test]
fn closure_candidate_using_reference_passes() {
    let wrapped = |left: &[Ranking], right: &[Ranking]| -> anyhow::Result<Vec<Pairing>> {
        Ok(deferred_acceptance(Side::Right, left, right)?.matching)
    };
    run_result_oracle(&OracleConfig::new(50, 9).with_seed(3), &wrapped).assert_pass();
}

#[test]
fn trace_closure_that_stops_early_still_passes() {
    // Fidelity only constrains the offers that were made, not how many.
    let first_offers = Named::new(
        "first-offers-only",
        |left: &[Ranking], _right: &[Ranking]| -> anyhow::Result<Run> {
            Ok(Run::new(
                left.iter()
                    .enumerate()
                    .filter_map(|(from, r)| r.get(0).map(|to| Offer::from_left(from, to)))
                    .collect(),
            ))
        },
    );
    run_trace_oracle(&OracleConfig::new(20, 6).with_seed(4), &first_offers).assert_pass();
}

#[test]
fn bare_trace_closure_is_accepted() {
    let skip_ahead = |left: &[Ranking], _right: &[Ranking]| -> anyhow::Result<Run> {
        Ok(Run::new(
            left.iter()
                .enumerate()
                .filter_map(|(from, r)| r.get(1).map(|to| Offer::from_left(from, to)))
                .collect(),
        ))
    };
    let report = run_trace_oracle(&OracleConfig::new(3, 4).with_seed(6), &skip_ahead);
    assert_eq!(report.candidate, "candidate");
    assert!(matches!(
        report.violation(),
        Some(Violation::Trace(TraceViolation::OutOfOrder { index: 0, .. }))
    ));
}

#[test]
fn unseeded_runs_record_their_seed() {
    let report = run_result_oracle(&OracleConfig::new(2, 3), &Builtin::GaleShapley);
    let replay = run_result_oracle(
        &OracleConfig::new(2, 3).with_seed(report.seed),
        &Builtin::GaleShapley,
    );
    assert_eq!(report, replay);
}
