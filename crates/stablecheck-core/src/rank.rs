//! Rank lookup: the inverse of a [`Ranking`].

use crate::types::{ParticipantId, Ranking};

/// Read-only position lookup over one ranking.
///
/// `position(id)` is the index of `id` in the ranking, 0 being most
/// preferred. Built once per participant and used for O(1) "prefers"
/// queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankTable {
    positions: Vec<Option<usize>>,
}

impl RankTable {
    /// Invert `ranking`. The table covers ids `0..ranking.len()`; any larger
    /// id is treated as unranked.
    #[must_use]
    pub fn new(ranking: &Ranking) -> Self {
        let mut positions = vec![None; ranking.len()];
        for (position, id) in ranking.iter().enumerate() {
            // Keep the first occurrence; validated rankings never repeat.
            if let Some(slot) = positions.get_mut(id)
                && slot.is_none()
            {
                *slot = Some(position);
            }
        }
        Self { positions }
    }

    /// Position of `id`, or `None` if it is not ranked.
    #[must_use]
    pub fn position(&self, id: ParticipantId) -> Option<usize> {
        self.positions.get(id).copied().flatten()
    }

    /// Whether `a` is ranked strictly above `b`.
    ///
    /// An unranked id is never preferred, and an unranked `b` is beaten by
    /// any ranked `a`.
    #[must_use]
    pub fn prefers(&self, a: ParticipantId, b: ParticipantId) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa < pb,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
