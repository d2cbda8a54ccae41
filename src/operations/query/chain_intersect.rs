use crate::geometry::line_chain::{Intersection, LineChain};
use crate::geometry::segment::Segment;

/// Result of a chain-chain intersection query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainIntersectResult {
    /// Every reported hit, in segment order of the first chain.
    pub intersections: Vec<Intersection>,
    /// Number of segment pairs that survived the bounding-box filter.
    pub narrow_phase_tests: usize,
}

/// Computes all intersections between two chains.
///
/// Each segment of the first chain is tested against the second chain's
/// bounding box before any segment pair is examined. A hit that lands on the
/// end vertex of a segment is attributed to the following segment and flagged
/// as a corner. Collinear overlapping segments report every contained endpoint
/// unless collinear hits are excluded.
#[derive(Debug)]
pub struct ChainIntersect<'a> {
    ours: &'a LineChain,
    theirs: &'a LineChain,
    exclude_collinear: bool,
}

impl<'a> ChainIntersect<'a> {
    /// Creates a new query between `ours` and `theirs`.
    #[must_use]
    pub fn new(ours: &'a LineChain, theirs: &'a LineChain) -> Self {
        Self {
            ours,
            theirs,
            exclude_collinear: false,
        }
    }

    /// Skips collinear overlaps and touches instead of reporting their endpoints.
    #[must_use]
    pub fn exclude_collinear(mut self, exclude: bool) -> Self {
        self.exclude_collinear = exclude;
        self
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self) -> ChainIntersectResult {
        let mut result = ChainIntersectResult::default();
        let Some(bbox_theirs) = self.theirs.bbox() else {
            return result;
        };

        for (s1, a) in self.ours.segments().enumerate() {
            if !bbox_theirs.intersects(&a.bbox()) {
                continue;
            }
            for (s2, b) in self.theirs.segments().enumerate() {
                result.narrow_phase_tests += 1;
                self.test_pair(s1, &a, s2, &b, &mut result.intersections);
            }
        }

        tracing::trace!(
            hits = result.intersections.len(),
            narrow_phase_tests = result.narrow_phase_tests,
            "chain intersection"
        );
        result
    }

    fn test_pair(&self, s1: usize, a: &Segment, s2: usize, b: &Segment, out: &mut Vec<Intersection>) {
        let hit = |point, ours_end: bool, theirs_end: bool, corner_ours, corner_theirs| Intersection {
            point,
            index_ours: next_index(self.ours, s1, ours_end),
            index_theirs: Some(next_index(self.theirs, s2, theirs_end)),
            is_corner_ours: corner_ours,
            is_corner_theirs: corner_theirs,
        };

        if a.collinear(b) {
            if self.exclude_collinear {
                return;
            }
            if a.contains(&b.a) {
                out.push(hit(b.a, false, false, false, true));
            }
            if a.contains(&b.b) {
                out.push(hit(b.b, false, true, false, true));
            }
            if b.contains(&a.a) {
                out.push(hit(a.a, false, false, true, false));
            }
            if b.contains(&a.b) {
                out.push(hit(a.b, true, false, true, false));
            }
            return;
        }

        if let Some(p) = a.intersect(b) {
            out.push(hit(
                p,
                p == a.b,
                p == b.b,
                p == a.a || p == a.b,
                p == b.a || p == b.b,
            ));
        }
    }
}

/// Segment index a hit is attributed to; a hit on the end vertex moves to the
/// next segment, wrapping around on closed chains.
fn next_index(chain: &LineChain, segment: usize, at_end: bool) -> usize {
    if !at_end {
        return segment;
    }
    let next = segment + 1;
    if chain.is_closed() && next == chain.segment_count() {
        0
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn chain(points: &[(i32, i32)], closed: bool) -> LineChain {
        let points: Vec<Point> = points.iter().map(|&(x, y)| pt(x, y)).collect();
        LineChain::from_points(&points, closed)
    }

    #[test]
    fn crossing_chains() {
        let a = chain(&[(0, 0), (10, 10)], false);
        let b = chain(&[(0, 10), (10, 0)], false);
        let result = ChainIntersect::new(&a, &b).execute();
        assert_eq!(result.intersections.len(), 1);
        let hit = result.intersections[0];
        assert_eq!(hit.point, pt(5, 5));
        assert_eq!(hit.index_ours, 0);
        assert_eq!(hit.index_theirs, Some(0));
        assert!(!hit.is_corner_ours);
        assert!(!hit.is_corner_theirs);
        assert_eq!(result.narrow_phase_tests, 1);
    }

    #[test]
    fn disjoint_bboxes_skip_narrow_phase() {
        let a = chain(&[(0, 0), (10, 0), (10, 10)], false);
        let b = chain(&[(100, 100), (110, 100), (110, 110)], false);
        let result = ChainIntersect::new(&a, &b).execute();
        assert!(result.intersections.is_empty());
        assert_eq!(result.narrow_phase_tests, 0);
    }

    #[test]
    fn hit_on_end_vertex_moves_to_next_segment() {
        let a = chain(&[(0, 5), (5, 5), (10, 5)], false);
        let b = chain(&[(5, 0), (5, 10)], false);
        let hits = ChainIntersect::new(&a, &b).execute().intersections;
        // Both segments of `a` touch (5, 5).
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.point == pt(5, 5) && h.is_corner_ours));
        assert!(hits.iter().all(|h| h.index_ours == 1));
        assert!(hits.iter().all(|h| !h.is_corner_theirs));
    }

    #[test]
    fn collinear_overlap_reports_endpoints() {
        let a = chain(&[(0, 0), (10, 0)], false);
        let b = chain(&[(5, 0), (15, 0)], false);
        let hits = ChainIntersect::new(&a, &b).execute().intersections;
        let points: Vec<Point> = hits.iter().map(|h| h.point).collect();
        assert_eq!(points, vec![pt(5, 0), pt(10, 0)]);
        assert!(hits[0].is_corner_theirs);
        assert!(hits[1].is_corner_ours);
        assert_eq!(hits[1].index_ours, 1);

        let excluded = ChainIntersect::new(&a, &b).exclude_collinear(true).execute();
        assert!(excluded.intersections.is_empty());
        assert_eq!(excluded.narrow_phase_tests, 1);
    }

    #[test]
    fn closed_chain_end_vertex_wraps() {
        let square = chain(&[(0, 0), (10, 0), (10, 10), (0, 10)], true);
        let spur = chain(&[(-5, -5), (0, 0)], false);
        let hits = ChainIntersect::new(&square, &spur).execute().intersections;
        assert!(hits.iter().any(|h| h.index_ours == 0 && h.is_corner_ours));
        assert!(hits.iter().all(|h| h.index_ours < square.segment_count()));
    }

    #[test]
    fn empty_chain_has_no_hits() {
        let a = chain(&[(0, 0), (10, 0)], false);
        let empty = LineChain::new();
        assert!(ChainIntersect::new(&a, &empty).execute().intersections.is_empty());
        assert!(ChainIntersect::new(&empty, &a).execute().intersections.is_empty());
    }
}
