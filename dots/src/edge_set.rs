use serde::{Deserialize, Serialize};

use crate::InvalidSnapshot;

/// Index of an edge in the canonical numbering of a [`Grid`](crate::Grid).
///
/// Every edge has exactly one id, no matter from which of its (up to two)
/// boxes it is named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EdgeId(pub(crate) usize);

/// A fixed-size set of [`EdgeId`]s, one bit per edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEdgeSet")]
pub(crate) struct EdgeSet {
    // Bits at or above `capacity` are always zero.
    words: Vec<u64>,
    capacity: usize,
}

#[derive(Deserialize)]
struct RawEdgeSet {
    words: Vec<u64>,
    capacity: usize,
}

impl TryFrom<RawEdgeSet> for EdgeSet {
    type Error = InvalidSnapshot;

    fn try_from(raw: RawEdgeSet) -> Result<Self, Self::Error> {
        let RawEdgeSet { words, capacity } = raw;
        if words.len() != capacity.div_ceil(64) {
            return Err(InvalidSnapshot::MalformedEdgeSet);
        }
        let spare_bits = words.len() * 64 - capacity;
        if spare_bits > 0 && words[words.len() - 1].leading_zeros() < spare_bits as u32 {
            return Err(InvalidSnapshot::MalformedEdgeSet);
        }
        Ok(Self { words, capacity })
    }
}

impl EdgeSet {
    /// Creates an empty set that can hold the ids `0..capacity`.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub(crate) fn contains(&self, id: EdgeId) -> bool {
        debug_assert!(id.0 < self.capacity);
        self.words[id.0 / 64] & (1u64 << (id.0 % 64)) != 0
    }

    /// Adds the id to the set. Returns whether it was newly inserted.
    pub(crate) fn insert(&mut self, id: EdgeId) -> bool {
        debug_assert!(id.0 < self.capacity);
        let word = &mut self.words[id.0 / 64];
        let mask = 1u64 << (id.0 % 64);
        let inserted = *word & mask == 0;
        *word |= mask;
        inserted
    }
}
