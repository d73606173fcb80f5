//! Data-model types shared by the generator and both checkers.
//!
//! Participants on either side are identified by their index, `0..n`. A
//! [`Ranking`] lists the opposite side's ids from most to least preferred.
//! The algorithm under test produces either a matching (a slice of
//! [`Pairing`]s) or a [`Run`] carrying its ordered proposal trace.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Identifier of a participant on one side of an instance.
pub type ParticipantId = usize;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which side of the instance a participant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The first side (e.g. companies).
    Left,
    /// The second side (e.g. candidates).
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One participant's preference list over the opposite side, most preferred
/// first.
///
/// A `Ranking` is immutable once built. Whether it is a permutation of
/// `0..n` is checked when it becomes part of an
/// [`Instance`](crate::Instance), not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking(Vec<ParticipantId>);

impl Ranking {
    /// Wrap an ordered list of opposite-side ids.
    #[must_use]
    pub const fn new(order: Vec<ParticipantId>) -> Self {
        Self(order)
    }

    /// The ids in preference order.
    #[must_use]
    pub fn as_slice(&self) -> &[ParticipantId] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ranking has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The id at `position` (0 = most preferred), if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<ParticipantId> {
        self.0.get(position).copied()
    }

    /// Iterate ids from most to least preferred.
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.0.iter().copied()
    }

    /// The entries ranked strictly above `partner`.
    ///
    /// If `partner` does not occur in the ranking every entry is returned,
    /// i.e. an unranked partner is treated as least preferred.
    #[must_use]
    pub fn preferred_over(&self, partner: ParticipantId) -> &[ParticipantId] {
        let cut = self
            .0
            .iter()
            .position(|&id| id == partner)
            .unwrap_or(self.0.len());
        &self.0[..cut]
    }
}

impl From<Vec<ParticipantId>> for Ranking {
    fn from(order: Vec<ParticipantId>) -> Self {
        Self(order)
    }
}

impl AsRef<[ParticipantId]> for Ranking {
    fn as_ref(&self) -> &[ParticipantId] {
        &self.0
    }
}

impl Index<usize> for Ranking {
    type Output = ParticipantId;

    fn index(&self, position: usize) -> &Self::Output {
        &self.0[position]
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// One left participant matched with one right participant.
///
/// A matching is a slice of pairings. Their order carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    /// The left-side participant.
    pub left: ParticipantId,
    /// The right-side participant.
    pub right: ParticipantId,
}

impl Pairing {
    /// Pair `left` with `right`.
    #[must_use]
    pub const fn new(left: ParticipantId, right: ParticipantId) -> Self {
        Self { left, right }
    }

    /// The id this pairing holds for `side`.
    #[must_use]
    pub const fn id(&self, side: Side) -> ParticipantId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L{}, R{})", self.left, self.right)
    }
}

// ---------------------------------------------------------------------------
// Offer / Run
// ---------------------------------------------------------------------------

/// A single proposal event: `from` offered to `to`.
///
/// `from_left` tells which side `from` belongs to; `to` is on the other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offer {
    /// The proposer.
    pub from: ParticipantId,
    /// The participant receiving the offer.
    pub to: ParticipantId,
    /// `true` when the proposer is on the left side.
    pub from_left: bool,
}

impl Offer {
    /// An offer made by a left participant.
    #[must_use]
    pub const fn from_left(from: ParticipantId, to: ParticipantId) -> Self {
        Self {
            from,
            to,
            from_left: true,
        }
    }

    /// An offer made by a right participant.
    #[must_use]
    pub const fn from_right(from: ParticipantId, to: ParticipantId) -> Self {
        Self {
            from,
            to,
            from_left: false,
        }
    }

    /// The proposer's side.
    #[must_use]
    pub const fn side(&self) -> Side {
        if self.from_left { Side::Left } else { Side::Right }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to) = if self.from_left { ('L', 'R') } else { ('R', 'L') };
        write!(f, "{from}{} -> {to}{}", self.from, self.to)
    }
}

/// Output of an instrumented algorithm run: the chronological offer trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Every offer made, in the order it was made.
    pub trace: Vec<Offer>,
}

impl Run {
    /// Wrap a trace.
    #[must_use]
    pub const fn new(trace: Vec<Offer>) -> Self {
        Self { trace }
    }
}
