use crate::geometry::line_chain::{Intersection, LineChain};

/// Finds the first self-intersection of a chain.
///
/// Every pair of distinct segments is checked for an endpoint of the later
/// segment lying on the earlier one, then for a proper crossing. Adjacent
/// segments sharing their common vertex do not count, and neither does the
/// first/last pair of a closed chain meeting at the closing vertex.
#[derive(Debug)]
pub struct SelfIntersect<'a> {
    chain: &'a LineChain,
}

impl<'a> SelfIntersect<'a> {
    /// Creates a new self-intersection query.
    #[must_use]
    pub fn new(chain: &'a LineChain) -> Self {
        Self { chain }
    }

    /// Executes the query, returning the first hit in segment order.
    #[must_use]
    pub fn execute(&self) -> Option<Intersection> {
        let count = self.chain.segment_count();
        let closed = self.chain.is_closed();

        for s1 in 0..count {
            let seg1 = self.chain.segment(to_isize(s1));
            for s2 in (s1 + 1)..count {
                let seg2 = self.chain.segment(to_isize(s2));
                let hit = |point| Intersection {
                    point,
                    index_ours: s1,
                    index_theirs: Some(s2),
                    is_corner_ours: false,
                    is_corner_theirs: false,
                };

                if s1 + 1 != s2 && seg1.contains(&seg2.a) {
                    return Some(hit(seg2.a));
                }
                if seg1.contains(&seg2.b) && !(closed && s1 == 0 && s2 == count - 1) {
                    return Some(hit(seg2.b));
                }
                if let Some(p) = seg1.intersect_with(&seg2, true, false) {
                    tracing::trace!(s1, s2, x = p.x, y = p.y, "self-intersection");
                    return Some(hit(p));
                }
            }
        }
        None
    }
}

fn to_isize(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}
