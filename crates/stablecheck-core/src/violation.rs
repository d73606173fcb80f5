//! Typed failures reported by the generator, the checkers, and the drivers.
//!
//! Every check returns `Ok(())` or one of these enums. Each variant carries
//! the ids, pairings, or offers needed to diagnose the failure without
//! re-running the trial.

use std::fmt;

use serde::Serialize;

use crate::types::{Offer, Pairing, ParticipantId, Side};

// ---------------------------------------------------------------------------
// GenerationError
// ---------------------------------------------------------------------------

/// An instance failed its structural invariant.
///
/// Raised by [`Instance::new`](crate::Instance::new). For generated instances
/// this indicates a bug in the oracle itself; for instances loaded from a
/// file it means the input is malformed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationError {
    /// The two sides have a different number of participants.
    SideSizeMismatch {
        /// Number of left rankings.
        left: usize,
        /// Number of right rankings.
        right: usize,
    },

    /// A ranking does not list exactly `n` entries.
    WrongLength {
        /// Side of the participant owning the ranking.
        side: Side,
        /// The participant owning the ranking.
        participant: ParticipantId,
        /// Required length (`n`).
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A ranking names an id outside `0..n`.
    EntryOutOfRange {
        /// Side of the participant owning the ranking.
        side: Side,
        /// The participant owning the ranking.
        participant: ParticipantId,
        /// Position of the bad entry.
        position: usize,
        /// The out-of-range id.
        id: ParticipantId,
        /// Instance size.
        size: usize,
    },

    /// A ranking lists the same id twice.
    DuplicateEntry {
        /// Side of the participant owning the ranking.
        side: Side,
        /// The participant owning the ranking.
        participant: ParticipantId,
        /// The repeated id.
        id: ParticipantId,
        /// Position of the first occurrence.
        first_position: usize,
        /// Position of the repeat.
        position: usize,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SideSizeMismatch { left, right } => {
                write!(
                    f,
                    "side sizes differ: {left} left rankings but {right} right rankings"
                )
            }
            Self::WrongLength {
                side,
                participant,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{side} participant {participant} ranks {actual} ids, expected {expected}"
                )
            }
            Self::EntryOutOfRange {
                side,
                participant,
                position,
                id,
                size,
            } => {
                write!(
                    f,
                    "{side} participant {participant} ranks id {id} at position \
                     {position}, outside 0..{size}"
                )
            }
            Self::DuplicateEntry {
                side,
                participant,
                id,
                first_position,
                position,
            } => {
                write!(
                    f,
                    "{side} participant {participant} ranks id {id} twice \
                     (positions {first_position} and {position})"
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {}

// ---------------------------------------------------------------------------
// ContractViolation
// ---------------------------------------------------------------------------

/// The algorithm under test failed to produce an output at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractViolation {
    /// The candidate returned an error.
    Errored {
        /// The candidate's error message, including its cause chain.
        message: String,
    },

    /// The candidate panicked.
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Errored { message } => write!(f, "candidate returned an error: {message}"),
            Self::Panicked { message } => write!(f, "candidate panicked: {message}"),
        }
    }
}

impl std::error::Error for ContractViolation {}

// ---------------------------------------------------------------------------
// StabilityViolation
// ---------------------------------------------------------------------------

/// A matching is incomplete, malformed, or unstable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StabilityViolation {
    /// The matching does not contain exactly `n` pairings.
    Incomplete {
        /// Required number of pairings (`n`).
        expected: usize,
        /// Number of pairings returned.
        actual: usize,
    },

    /// A pairing names an id outside `0..n`.
    OutOfRange {
        /// Index of the pairing in the matching.
        index: usize,
        /// The offending pairing.
        pairing: Pairing,
        /// Which of its ids is out of range.
        side: Side,
        /// Instance size.
        size: usize,
    },

    /// A participant appears in more than one pairing.
    Duplicate {
        /// Side of the repeated participant.
        side: Side,
        /// The repeated id.
        id: ParticipantId,
        /// Index of the first pairing containing it.
        first_index: usize,
        /// Index of the second pairing containing it.
        second_index: usize,
    },

    /// `left` and `right` both strictly prefer each other to their partners.
    BlockingPair {
        /// Left participant of the blocking pair.
        left: ParticipantId,
        /// Right participant of the blocking pair.
        right: ParticipantId,
        /// The right participant `left` is currently matched with.
        left_partner: ParticipantId,
        /// The left participant `right` is currently matched with.
        right_partner: ParticipantId,
    },
}

impl fmt::Display for StabilityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { expected, actual } => {
                write!(
                    f,
                    "incomplete matching: expected {expected} pairings, got {actual}"
                )
            }
            Self::OutOfRange {
                index,
                pairing,
                side,
                size,
            } => {
                write!(
                    f,
                    "invalid pairing #{index} {pairing}: {side} id {} is outside 0..{size}",
                    pairing.id(*side)
                )
            }
            Self::Duplicate {
                side,
                id,
                first_index,
                second_index,
            } => {
                write!(
                    f,
                    "{side} participant {id} is matched more than once \
                     (pairings #{first_index} and #{second_index})"
                )
            }
            Self::BlockingPair {
                left,
                right,
                left_partner,
                right_partner,
            } => {
                write!(
                    f,
                    "blocking pair (L{left}, R{right}): L{left} prefers R{right} to its \
                     partner R{left_partner} and R{right} prefers L{left} to its \
                     partner L{right_partner}"
                )
            }
        }
    }
}

impl std::error::Error for StabilityViolation {}

// ---------------------------------------------------------------------------
// TraceViolation
// ---------------------------------------------------------------------------

/// A proposal trace is not one a greedy proposal algorithm could produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceViolation {
    /// The offer names a participant outside `0..n`.
    OutOfRange {
        /// Position of the offer in the trace.
        index: usize,
        /// The offending offer.
        offer: Offer,
        /// Instance size.
        size: usize,
    },

    /// The same proposer made the same offer twice.
    RepeatedOffer {
        /// Position of the repeat in the trace.
        index: usize,
        /// Position of the original offer.
        first_index: usize,
        /// The repeated offer.
        offer: Offer,
    },

    /// The proposer skipped ahead of (or fell behind) its preference order.
    OutOfOrder {
        /// Position of the offer in the trace.
        index: usize,
        /// The offending offer.
        offer: Offer,
        /// The target the proposer should have offered to next, or `None`
        /// if it had already offered to everyone.
        expected: Option<ParticipantId>,
    },
}

impl TraceViolation {
    /// Position of the offending offer in the trace.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::OutOfRange { index, .. }
            | Self::RepeatedOffer { index, .. }
            | Self::OutOfOrder { index, .. } => *index,
        }
    }
}

impl fmt::Display for TraceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                index,
                offer,
                size,
            } => {
                write!(
                    f,
                    "offer #{index} ({offer}) names a participant outside 0..{size}"
                )
            }
            Self::RepeatedOffer {
                index,
                first_index,
                offer,
            } => {
                write!(
                    f,
                    "offer #{index} ({offer}) repeats offer #{first_index}"
                )
            }
            Self::OutOfOrder {
                index,
                offer,
                expected: Some(expected),
            } => {
                write!(
                    f,
                    "offer #{index} ({offer}) is out of preference order: expected \
                     target {expected}, got {}",
                    offer.to
                )
            }
            Self::OutOfOrder {
                index,
                offer,
                expected: None,
            } => {
                write!(
                    f,
                    "offer #{index} ({offer}) comes after the proposer exhausted its ranking"
                )
            }
        }
    }
}

impl std::error::Error for TraceViolation {}

// ---------------------------------------------------------------------------
// Violation
// ---------------------------------------------------------------------------

/// Any failure a single oracle trial can end with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "category", content = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// The instance itself was malformed.
    Generation(GenerationError),
    /// The candidate errored or panicked.
    Contract(ContractViolation),
    /// The candidate's matching failed the stability checker.
    Stability(StabilityViolation),
    /// The candidate's trace failed the fidelity checker.
    Trace(TraceViolation),
}

impl Violation {
    /// Short category name, used in reports and logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Generation(_) => "generation",
            Self::Contract(_) => "contract",
            Self::Stability(_) => "stability",
            Self::Trace(_) => "trace",
        }
    }

    /// Whether the failure is attributable to the oracle rather than the
    /// candidate.
    #[must_use]
    pub const fn is_oracle_fault(&self) -> bool {
        matches!(self, Self::Generation(_))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(e) => write!(f, "generation error: {e}"),
            Self::Contract(e) => write!(f, "contract violation: {e}"),
            Self::Stability(e) => write!(f, "stability violation: {e}"),
            Self::Trace(e) => write!(f, "trace violation: {e}"),
        }
    }
}

impl std::error::Error for Violation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Generation(e) => Some(e),
            Self::Contract(e) => Some(e),
            Self::Stability(e) => Some(e),
            Self::Trace(e) => Some(e),
        }
    }
}

impl From<GenerationError> for Violation {
    fn from(e: GenerationError) -> Self {
        Self::Generation(e)
    }
}

impl From<ContractViolation> for Violation {
    fn from(e: ContractViolation) -> Self {
        Self::Contract(e)
    }
}

impl From<StabilityViolation> for Violation {
    fn from(e: StabilityViolation) -> Self {
        Self::Stability(e)
    }
}

impl From<TraceViolation> for Violation {
    fn from(e: TraceViolation) -> Self {
        Self::Trace(e)
    }
}
