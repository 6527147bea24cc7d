//! Paired ends: the routes through one element.
//!
//! A [`PairedEnds`] group holds exactly two vertices of the *same* element
//! that a train can pass between. A rail has one group; a turnout has one per
//! wide end (each sharing the narrow end); a crossing has one per straight
//! route and one per slip; a junction pairs its two module-side ends.
//! Bumpers have none.

use super::vertex::VertexId;

/// Index of a paired-ends group in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(pub(crate) u32);

impl PairId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Two traversable ends of one element instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairedEnds {
    ends: [VertexId; 2],
}

impl PairedEnds {
    pub(crate) fn new(a: VertexId, b: VertexId) -> Self {
        Self { ends: [a, b] }
    }

    /// Both members, in the order they were paired.
    pub fn ends(&self) -> [VertexId; 2] {
        self.ends
    }

    /// Returns `true` if `v` is one of the two ends.
    pub fn contains(&self, v: VertexId) -> bool {
        self.ends.contains(&v)
    }

    /// Returns the other member given one.
    ///
    /// Returns `None` (and logs) if `v` is not a member of this group.
    pub fn find_other(&self, v: VertexId) -> Option<VertexId> {
        match self.ends {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "no sibling for {v} in pair ({}, {})",
                    self.ends[0],
                    self.ends[1]
                );
                None
            }
        }
    }

    /// The group key: both ends, smaller id first.
    pub fn key(&self) -> (VertexId, VertexId) {
        let [a, b] = self.ends;
        if a <= b { (a, b) } else { (b, a) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_other_returns_sibling() {
        let pair = PairedEnds::new(VertexId(3), VertexId(7));
        assert_eq!(pair.find_other(VertexId(3)), Some(VertexId(7)));
        assert_eq!(pair.find_other(VertexId(7)), Some(VertexId(3)));
    }

    #[test]
    fn find_other_rejects_non_member() {
        let pair = PairedEnds::new(VertexId(3), VertexId(7));
        assert_eq!(pair.find_other(VertexId(4)), None);
        assert!(!pair.contains(VertexId(4)));
    }

    #[test]
    fn key_is_order_independent() {
        let a = PairedEnds::new(VertexId(9), VertexId(2));
        let b = PairedEnds::new(VertexId(2), VertexId(9));
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), (VertexId(2), VertexId(9)));
    }
}
