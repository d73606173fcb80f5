//! Trace fidelity checker.
//!
//! A greedy proposal algorithm has every proposer walk its own ranking from
//! the top, one offer at a time, never skipping and never repeating. The
//! checker replays a trace against the instance with one cursor per
//! proposer and rejects the first offer that breaks this.
//!
//! Which side proposes, and how proposers are scheduled against each other,
//! is irrelevant: cursors are per participant and per side.

use std::collections::HashMap;

use crate::instance::Instance;
use crate::types::{Offer, Side};
use crate::violation::TraceViolation;

/// Replay `trace` against `instance`.
///
/// Checks, for each offer in order:
/// 1. both ids lie in `0..n`;
/// 2. no identical offer appeared earlier;
/// 3. the target is the proposer's ranking entry at its cursor, after which
///    the cursor advances.
///
/// # Errors
/// Returns the [`TraceViolation`] for the first offending offer.
pub fn check_trace(instance: &Instance, trace: &[Offer]) -> Result<(), TraceViolation> {
    let size = instance.size();
    let mut left_cursor = vec![0usize; size];
    let mut right_cursor = vec![0usize; size];
    let mut seen: HashMap<Offer, usize> = HashMap::with_capacity(trace.len());

    for (index, offer) in trace.iter().enumerate() {
        if offer.from >= size || offer.to >= size {
            return Err(TraceViolation::OutOfRange {
                index,
                offer: *offer,
                size,
            });
        }

        if let Some(&first_index) = seen.get(offer) {
            return Err(TraceViolation::RepeatedOffer {
                index,
                first_index,
                offer: *offer,
            });
        }
        seen.insert(*offer, index);

        let side = offer.side();
        let cursor = match side {
            Side::Left => &mut left_cursor[offer.from],
            Side::Right => &mut right_cursor[offer.from],
        };
        let expected = instance.rankings(side)[offer.from].get(*cursor);
        if expected != Some(offer.to) {
            return Err(TraceViolation::OutOfOrder {
                index,
                offer: *offer,
                expected,
            });
        }
        *cursor += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left `[[0,1],[1,0]]`, right `[[0,1],[1,0]]`.
    fn two_by_two() -> Instance {
        Instance::from_orders(vec![vec![0, 1], vec![1, 0]], vec![vec![0, 1], vec![1, 0]]).unwrap()
    }

    #[test]
    fn empty_trace_passes() {
        assert_eq!(check_trace(&two_by_two(), &[]), Ok(()));
    }

    #[test]
    fn greedy_trace_passes() {
        let trace = [Offer::from_left(0, 0), Offer::from_left(1, 1)];
        assert_eq!(check_trace(&two_by_two(), &trace), Ok(()));
    }

    #[test]
    fn repeated_offer_is_rejected() {
        let trace = [Offer::from_left(0, 0), Offer::from_left(0, 0)];
        assert_eq!(
            check_trace(&two_by_two(), &trace),
            Err(TraceViolation::RepeatedOffer {
                index: 1,
                first_index: 0,
                offer: Offer::from_left(0, 0),
            })
        );
    }

    #[test]
    fn skipping_first_choice_is_out_of_order() {
        let trace = [Offer::from_left(0, 1)];
        assert_eq!(
            check_trace(&two_by_two(), &trace),
            Err(TraceViolation::OutOfOrder {
                index: 0,
                offer: Offer::from_left(0, 1),
                expected: Some(0),
            })
        );
    }

    #[test]
    fn walking_down_the_ranking_passes() {
        let trace = [Offer::from_left(0, 0), Offer::from_left(0, 1)];
        assert_eq!(check_trace(&two_by_two(), &trace), Ok(()));
    }

    #[test]
    fn exhausted_proposer_can_only_repeat() {
        let inst = Instance::from_orders(vec![vec![0]], vec![vec![0]]).unwrap();
        // The second offer is a repeat, so it is reported as such before the
        // order check can see the exhausted cursor.
        let trace = [Offer::from_left(0, 0), Offer::from_left(0, 0)];
        assert!(matches!(
            check_trace(&inst, &trace),
            Err(TraceViolation::RepeatedOffer { index: 1, .. })
        ));
    }

    #[test]
    fn sides_have_independent_cursors() {
        // R0's first choice is L0, R1's is L1; left and right offers
        // interleave freely.
        let trace = [
            Offer::from_left(0, 0),
            Offer::from_right(1, 1),
            Offer::from_right(0, 0),
            Offer::from_left(1, 1),
        ];
        assert_eq!(check_trace(&two_by_two(), &trace), Ok(()));
    }

    #[test]
    fn same_ids_from_other_side_are_not_a_repeat() {
        let trace = [Offer::from_left(0, 0), Offer::from_right(0, 0)];
        assert_eq!(check_trace(&two_by_two(), &trace), Ok(()));
    }

    #[test]
    fn right_side_order_is_checked() {
        let trace = [Offer::from_right(1, 0)];
        assert_eq!(
            check_trace(&two_by_two(), &trace),
            Err(TraceViolation::OutOfOrder {
                index: 0,
                offer: Offer::from_right(1, 0),
                expected: Some(1),
            })
        );
    }

    #[test]
    fn out_of_range_proposer() {
        let trace = [Offer::from_left(0, 0), Offer::from_left(2, 0)];
        assert_eq!(
            check_trace(&two_by_two(), &trace),
            Err(TraceViolation::OutOfRange {
                index: 1,
                offer: Offer::from_left(2, 0),
                size: 2,
            })
        );
    }

    #[test]
    fn out_of_range_target() {
        let trace = [Offer::from_right(0, 5)];
        assert!(matches!(
            check_trace(&two_by_two(), &trace),
            Err(TraceViolation::OutOfRange { index: 0, .. })
        ));
    }
}
