//! Stability checker: completeness, validity, and absence of blocking pairs.
//!
//! [`check_matching`] runs the three checks in order and stops at the first
//! violation. Each check is also public so it can be exercised on its own.
//!
//! | Check | Property |
//! |-------|----------|
//! | [`check_completeness`] | exactly `n` pairings |
//! | [`check_validity`] | ids in `0..n`, each participant matched at most once |
//! | [`check_stability`] | no left/right pair prefers each other to their partners |

use std::collections::HashMap;

use crate::instance::Instance;
use crate::types::{Pairing, ParticipantId, Side};
use crate::violation::StabilityViolation;

/// Run every matching check against `instance`, failing fast.
///
/// # Errors
/// Returns the first [`StabilityViolation`] found.
pub fn check_matching(instance: &Instance, matching: &[Pairing]) -> Result<(), StabilityViolation> {
    check_completeness(instance, matching)?;
    check_validity(instance, matching)?;
    check_stability(instance, matching)
}

/// The matching must contain exactly one pairing per participant.
///
/// # Errors
/// Returns [`StabilityViolation::Incomplete`] if the size is wrong.
pub fn check_completeness(
    instance: &Instance,
    matching: &[Pairing],
) -> Result<(), StabilityViolation> {
    let expected = instance.size();
    if matching.len() == expected {
        Ok(())
    } else {
        Err(StabilityViolation::Incomplete {
            expected,
            actual: matching.len(),
        })
    }
}

/// Every id must be in `0..n` and no participant may appear twice.
///
/// # Errors
/// Returns [`StabilityViolation::OutOfRange`] or
/// [`StabilityViolation::Duplicate`] for the first offending pairing.
pub fn check_validity(instance: &Instance, matching: &[Pairing]) -> Result<(), StabilityViolation> {
    let size = instance.size();
    let mut left_seen: HashMap<ParticipantId, usize> = HashMap::with_capacity(matching.len());
    let mut right_seen: HashMap<ParticipantId, usize> = HashMap::with_capacity(matching.len());

    for (index, pairing) in matching.iter().enumerate() {
        for (side, seen) in [(Side::Left, &mut left_seen), (Side::Right, &mut right_seen)] {
            let id = pairing.id(side);
            if id >= size {
                return Err(StabilityViolation::OutOfRange {
                    index,
                    pairing: *pairing,
                    side,
                    size,
                });
            }
            if let Some(first_index) = seen.insert(id, index) {
                return Err(StabilityViolation::Duplicate {
                    side,
                    id,
                    first_index,
                    second_index: index,
                });
            }
        }
    }
    Ok(())
}

/// No blocking pair may exist.
///
/// For pairings `(L1, R1)` and `(L2, R2)` with `L1 != L2`, the matching is
/// blocked if `L1` ranks `R2` above `R1` and `R2` ranks `L1` above `L2`.
/// Every ordered combination of pairings is covered. Pairings with ids
/// outside the instance are skipped; run [`check_validity`] first to reject
/// them.
///
/// # Errors
/// Returns the first [`StabilityViolation::BlockingPair`] found.
pub fn check_stability(instance: &Instance, matching: &[Pairing]) -> Result<(), StabilityViolation> {
    match blocking_pairs(instance, matching).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Every blocking pair in `matching`, in the order pairings appear and then
/// in the left participant's preference order.
#[must_use]
pub fn blocking_pairs(instance: &Instance, matching: &[Pairing]) -> Vec<StabilityViolation> {
    let right_tables = instance.rank_tables(Side::Right);
    let partner_of_right: HashMap<ParticipantId, ParticipantId> =
        matching.iter().map(|p| (p.right, p.left)).collect();

    let mut found = Vec::new();
    for pairing in matching {
        let Some(ranking) = instance.left().get(pairing.left) else {
            continue;
        };
        // Right participants this left participant would rather have.
        for &right in ranking.preferred_over(pairing.right) {
            let Some(&right_partner) = partner_of_right.get(&right) else {
                continue;
            };
            if right_partner == pairing.left {
                continue;
            }
            if right_tables[right].prefers(pairing.left, right_partner) {
                found.push(StabilityViolation::BlockingPair {
                    left: pairing.left,
                    right,
                    left_partner: pairing.right,
                    right_partner,
                });
            }
        }
    }
    found
}
