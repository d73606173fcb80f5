//! A validated matching instance: one complete, strict ranking per
//! participant on each side.

use serde::{Deserialize, Serialize};

use crate::rank::RankTable;
use crate::types::{ParticipantId, Ranking, Side};
use crate::violation::GenerationError;

/// Preference rankings for both sides of an `n`-by-`n` matching problem.
///
/// Every ranking is a permutation of `0..n`. This is enforced by
/// [`Instance::new`], which is also used when deserializing, so an `Instance`
/// value always upholds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInstance")]
pub struct Instance {
    left: Vec<Ranking>,
    right: Vec<Ranking>,
}

/// Unvalidated wire form of [`Instance`].
#[derive(Deserialize)]
struct RawInstance {
    left: Vec<Ranking>,
    right: Vec<Ranking>,
}

impl TryFrom<RawInstance> for Instance {
    type Error = GenerationError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Self::new(raw.left, raw.right)
    }
}

impl Instance {
    /// Build an instance, checking that both sides have the same size and
    /// every ranking is a permutation of `0..n`.
    ///
    /// # Errors
    /// Returns the first [`GenerationError`] found, scanning the left side
    /// before the right.
    pub fn new(left: Vec<Ranking>, right: Vec<Ranking>) -> Result<Self, GenerationError> {
        if left.len() != right.len() {
            return Err(GenerationError::SideSizeMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        let n = left.len();
        for (participant, ranking) in left.iter().enumerate() {
            validate_ranking(Side::Left, participant, ranking, n)?;
        }
        for (participant, ranking) in right.iter().enumerate() {
            validate_ranking(Side::Right, participant, ranking, n)?;
        }
        Ok(Self { left, right })
    }

    /// Convenience constructor from plain nested vectors.
    ///
    /// # Errors
    /// Same as [`Instance::new`].
    pub fn from_orders(
        left: Vec<Vec<ParticipantId>>,
        right: Vec<Vec<ParticipantId>>,
    ) -> Result<Self, GenerationError> {
        Self::new(
            left.into_iter().map(Ranking::new).collect(),
            right.into_iter().map(Ranking::new).collect(),
        )
    }

    /// Number of participants per side.
    #[must_use]
    pub fn size(&self) -> usize {
        self.left.len()
    }

    /// Left-side rankings, indexed by left id.
    #[must_use]
    pub fn left(&self) -> &[Ranking] {
        &self.left
    }

    /// Right-side rankings, indexed by right id.
    #[must_use]
    pub fn right(&self) -> &[Ranking] {
        &self.right
    }

    /// Rankings held by participants on `side`.
    #[must_use]
    pub fn rankings(&self, side: Side) -> &[Ranking] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Rank lookups for every participant on `side`.
    #[must_use]
    pub fn rank_tables(&self, side: Side) -> Vec<RankTable> {
        self.rankings(side).iter().map(RankTable::new).collect()
    }
}

/// Check that `ranking` is a permutation of `0..n`.
///
/// # Errors
/// Returns a [`GenerationError`] naming the first defect.
pub fn validate_ranking(
    side: Side,
    participant: ParticipantId,
    ranking: &Ranking,
    n: usize,
) -> Result<(), GenerationError> {
    if ranking.len() != n {
        return Err(GenerationError::WrongLength {
            side,
            participant,
            expected: n,
            actual: ranking.len(),
        });
    }

    let mut seen_at: Vec<Option<usize>> = vec![None; n];
    for (position, id) in ranking.iter().enumerate() {
        let Some(slot) = seen_at.get_mut(id) else {
            return Err(GenerationError::EntryOutOfRange {
                side,
                participant,
                position,
                id,
                size: n,
            });
        };
        if let Some(first_position) = *slot {
            return Err(GenerationError::DuplicateEntry {
                side,
                participant,
                id,
                first_position,
                position,
            });
        }
        *slot = Some(position);
    }
    Ok(())
}
