//! Bundled candidates: a reference deferred-acceptance implementation and a
//! set of deliberately broken variants.
//!
//! The reference is what the oracle's self-tests pass against; the broken
//! variants each violate exactly one property so the drivers can be shown to
//! catch it.

use std::fmt;

use anyhow::{Context as _, bail};
use serde::Serialize;
use stablecheck_core::{Offer, Pairing, RankTable, Ranking, Run, Side, validate_ranking};

use crate::candidate::{InstrumentedAlgorithm, MatchingAlgorithm};

// ---------------------------------------------------------------------------
// Deferred acceptance
// ---------------------------------------------------------------------------

/// Output of one deferred-acceptance run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Final matching, sorted by left id.
    pub matching: Vec<Pairing>,
    /// Every offer made, in order.
    pub trace: Vec<Offer>,
}

/// Gale–Shapley deferred acceptance with `proposer` making the offers.
///
/// Free proposers are kept on a stack; each offers to the next entry of its
/// ranking until it is held by someone. A receiver holds the best offer so
/// far and releases its previous proposer when a better one arrives.
///
/// # Errors
/// Fails if the sides differ in size or any ranking is not a permutation of
/// `0..n`.
pub fn deferred_acceptance(
    proposer: Side,
    left: &[Ranking],
    right: &[Ranking],
) -> anyhow::Result<Outcome> {
    if left.len() != right.len() {
        bail!(
            "sides differ in size: {} left, {} right",
            left.len(),
            right.len()
        );
    }
    let n = left.len();
    for (side, rankings) in [(Side::Left, left), (Side::Right, right)] {
        for (participant, ranking) in rankings.iter().enumerate() {
            validate_ranking(side, participant, ranking, n).context("malformed input")?;
        }
    }
    let (proposer_prefs, receiver_prefs) = match proposer {
        Side::Left => (left, right),
        Side::Right => (right, left),
    };
    let receiver_tables: Vec<RankTable> = receiver_prefs.iter().map(RankTable::new).collect();

    let mut next = vec![0usize; n];
    let mut held_by: Vec<Option<usize>> = vec![None; n];
    let mut free: Vec<usize> = (0..n).rev().collect();
    let mut trace = Vec::with_capacity(n);

    while let Some(p) = free.pop() {
        let target = proposer_prefs[p]
            .get(next[p])
            .with_context(|| format!("{proposer} participant {p} exhausted its ranking"))?;
        next[p] += 1;
        trace.push(Offer {
            from: p,
            to: target,
            from_left: proposer == Side::Left,
        });

        let slot = held_by
            .get_mut(target)
            .with_context(|| format!("{proposer} participant {p} ranks unknown id {target}"))?;
        match *slot {
            None => *slot = Some(p),
            Some(current) if receiver_tables[target].prefers(p, current) => {
                *slot = Some(p);
                free.push(current);
            }
            Some(_) => free.push(p),
        }
    }

    let mut matching: Vec<Pairing> = held_by
        .iter()
        .enumerate()
        .filter_map(|(receiver, held)| {
            held.map(|p| match proposer {
                Side::Left => Pairing::new(p, receiver),
                Side::Right => Pairing::new(receiver, p),
            })
        })
        .collect();
    matching.sort_by_key(|pairing| pairing.left);

    Ok(Outcome { matching, trace })
}

// ---------------------------------------------------------------------------
// Builtin candidates
// ---------------------------------------------------------------------------

/// Every candidate shipped with the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Builtin {
    /// Deferred acceptance, left side proposing.
    GaleShapley,
    /// Deferred acceptance, right side proposing.
    GaleShapleyRight,
    /// Reference result with the right partners of the first two pairings
    /// swapped.
    SwapPartners,
    /// Reference result with the last pairing removed.
    DropLast,
    /// Pairs left `i` with right `i`, ignoring preferences.
    Identity,
    /// Proposers start at their second choice.
    SkipFirstChoice,
    /// Reference trace with its first offer made twice.
    RepeatOffer,
    /// Panics on every call.
    Panicking,
    /// Returns an error on every call.
    Erroring,
}

impl Builtin {
    /// All builtins, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::GaleShapley,
        Self::GaleShapleyRight,
        Self::SwapPartners,
        Self::DropLast,
        Self::Identity,
        Self::SkipFirstChoice,
        Self::RepeatOffer,
        Self::Panicking,
        Self::Erroring,
    ];

    /// Kebab-case name, as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GaleShapley => "gale-shapley",
            Self::GaleShapleyRight => "gale-shapley-right",
            Self::SwapPartners => "swap-partners",
            Self::DropLast => "drop-last",
            Self::Identity => "identity",
            Self::SkipFirstChoice => "skip-first-choice",
            Self::RepeatOffer => "repeat-offer",
            Self::Panicking => "panicking",
            Self::Erroring => "erroring",
        }
    }

    /// Whether this candidate is expected to pass both oracles.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::GaleShapley | Self::GaleShapleyRight)
    }

    fn outcome(self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Outcome> {
        match self {
            Self::GaleShapleyRight => deferred_acceptance(Side::Right, left, right),
            Self::SkipFirstChoice => {
                let rotated: Vec<Ranking> = left
                    .iter()
                    .map(|ranking| {
                        let mut order = ranking.as_slice().to_vec();
                        if !order.is_empty() {
                            order.rotate_left(1);
                        }
                        Ranking::new(order)
                    })
                    .collect();
                deferred_acceptance(Side::Left, &rotated, right)
            }
            Self::Panicking => panic!("{} candidate always panics", self.as_str()),
            Self::Erroring => bail!("{} candidate always fails", self.as_str()),
            _ => deferred_acceptance(Side::Left, left, right),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MatchingAlgorithm for Builtin {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn matching(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Vec<Pairing>> {
        if *self == Self::Identity {
            return Ok((0..left.len()).map(|i| Pairing::new(i, i)).collect());
        }
        let mut matching = self.outcome(left, right)?.matching;
        match self {
            Self::SwapPartners if matching.len() >= 2 => {
                let first = matching[0].right;
                matching[0].right = matching[1].right;
                matching[1].right = first;
            }
            Self::DropLast => {
                matching.pop();
            }
            _ => {}
        }
        Ok(matching)
    }
}

impl InstrumentedAlgorithm for Builtin {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn run(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Run> {
        if *self == Self::Identity {
            return Ok(Run::default());
        }
        let mut trace = self.outcome(left, right)?.trace;
        if *self == Self::RepeatOffer
            && let Some(&first) = trace.first()
        {
            trace.insert(1, first);
        }
        Ok(Run::new(trace))
    }
}
