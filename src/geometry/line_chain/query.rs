use crate::geometry::arc::Arc;
use crate::geometry::segment::Segment;
use crate::math::polygon_2d::{ray_cast_inside, signed_area_2d};
use crate::math::{
    distance, round_coord, round_point, squared_distance, to_point2, Coord, ECoord, Point,
};
use crate::operations::query::{ChainIntersect, SelfIntersect};

use super::{ChainShape, Intersection, LineChain};

/// Outcome of a successful proximity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// Distance between the query point and the chain.
    pub actual: Coord,
    /// Closest location on the chain.
    pub location: Point,
}

impl LineChain {
    /// Total path length; arc runs contribute their true arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        let straight: f64 = (0..self.segment_count())
            .filter(|&i| !self.is_arc_segment(i))
            .map(|i| self.segment_at(i).length())
            .sum();
        straight + self.arcs.iter().map(Arc::length).sum::<f64>()
    }

    /// Signed enclosed area (counter-clockwise positive); zero for open chains.
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.closed {
            signed_area_2d(&self.points)
        } else {
            0.0
        }
    }

    /// Even-odd containment test for closed chains.
    ///
    /// With `accuracy > 1`, points within `accuracy` of an edge also count as
    /// inside. Open chains and chains with fewer than three vertices contain nothing.
    #[must_use]
    pub fn point_inside(&self, p: &Point, accuracy: Coord) -> bool {
        if !self.closed || self.points.len() < 3 {
            return false;
        }
        let inside = ray_cast_inside(&self.points, p);
        if accuracy <= 1 {
            inside
        } else {
            inside || self.point_on_edge(p, accuracy)
        }
    }

    /// Returns `true` if `p` lies within `accuracy + 1` of any edge.
    #[must_use]
    pub fn point_on_edge(&self, p: &Point, accuracy: Coord) -> bool {
        self.edge_containing_point(p, accuracy).is_some()
    }

    /// Index of the first segment within `accuracy + 1` of `p`.
    ///
    /// A single-vertex chain reports segment 0 when `p` is close to its vertex.
    #[must_use]
    pub fn edge_containing_point(&self, p: &Point, accuracy: Coord) -> Option<usize> {
        let limit = f64::from(accuracy) + 1.0;
        match self.points.as_slice() {
            [] => None,
            [only] => (distance(only, p) <= limit).then_some(0),
            _ => self.segments().position(|s| {
                s.a == *p || s.b == *p || f64::from(s.distance(p)) <= limit
            }),
        }
    }

    /// Squared distance from `p` to the chain; zero inside a closed chain
    /// unless `outline_only`. `None` for an empty chain.
    #[must_use]
    pub fn squared_distance(&self, p: &Point, outline_only: bool) -> Option<ECoord> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some(squared_distance(only, p)),
            _ => {
                if !outline_only && self.point_inside(p, 0) {
                    return Some(0);
                }
                self.segments().map(|s| s.squared_distance(p)).min()
            }
        }
    }

    /// Distance from `p` to the chain; see [`LineChain::squared_distance`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(&self, p: &Point, outline_only: bool) -> Option<f64> {
        self.squared_distance(p, outline_only)
            .map(|d| (d as f64).sqrt())
    }

    /// Tests whether `p` is closer than `clearance` to the chain.
    ///
    /// A point inside a closed chain collides at distance zero.
    #[must_use]
    pub fn collide(&self, p: &Point, clearance: Coord) -> Option<Collision> {
        if self.point_inside(p, clearance) {
            return Some(Collision {
                actual: 0,
                location: *p,
            });
        }
        let (dist_sq, location) = self
            .segments()
            .map(|s| {
                let n = s.nearest_point(p);
                (squared_distance(&n, p), n)
            })
            .min_by_key(|(d, _)| *d)?;
        within(dist_sq, clearance).then(|| Collision {
            actual: sqrt_coord(dist_sq),
            location,
        })
    }

    /// Tests whether `seg` comes closer than `clearance` to the chain.
    #[must_use]
    pub fn collide_segment(&self, seg: &Segment, clearance: Coord) -> Option<Collision> {
        if self.point_inside(&seg.a, 0) {
            return Some(Collision {
                actual: 0,
                location: seg.a,
            });
        }
        let (dist_sq, location) = self
            .segments()
            .map(|s| (s.squared_distance_to_segment(seg), nearest_to_segment(&s, seg)))
            .min_by_key(|(d, _)| *d)?;
        within(dist_sq, clearance).then(|| Collision {
            actual: sqrt_coord(dist_sq),
            location,
        })
    }

    /// Returns `true` if `p` is within `clearance` of an edge or coincides
    /// with a vertex.
    #[must_use]
    pub fn check_clearance(&self, p: &Point, clearance: Coord) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => only == p,
            _ => self
                .segments()
                .any(|s| s.a == *p || s.b == *p || s.distance(p) <= clearance),
        }
    }

    /// Index of the segment closest to `p`; the first one wins ties.
    #[must_use]
    pub fn nearest_segment(&self, p: &Point) -> Option<usize> {
        self.segments()
            .enumerate()
            .min_by_key(|(_, s)| s.squared_distance(p))
            .map(|(i, _)| i)
    }

    /// Closest point on the chain to `p`.
    ///
    /// Unless `allow_internal_shape_points`, the interior tessellation segments
    /// of arcs are skipped and a hit on an arc's first or last segment snaps
    /// to that arc's endpoint vertex.
    #[must_use]
    pub fn nearest_point(&self, p: &Point, allow_internal_shape_points: bool) -> Option<Point> {
        match self.points.as_slice() {
            [] => return None,
            [only] => return Some(*only),
            _ => {}
        }

        let nearest = self
            .segments()
            .enumerate()
            .filter(|(i, _)| allow_internal_shape_points || !self.is_internal_arc_segment(*i))
            .min_by_key(|(_, s)| s.squared_distance(p));
        let Some((index, seg)) = nearest else {
            return self.nearest_point(p, true);
        };

        if !allow_internal_shape_points && self.is_arc_segment(index) {
            let end = (index + 1) % self.points.len();
            let candidates = [index, end]
                .into_iter()
                .filter(|&v| self.is_arc_start(v) || self.is_arc_end(v));
            if let Some(v) = candidates.min_by_key(|&v| squared_distance(&self.points[v], p)) {
                return Some(self.points[v]);
            }
        }

        Some(seg.nearest_point(p))
    }

    /// An arc segment that is neither the first nor the last of its arc.
    fn is_internal_arc_segment(&self, segment: usize) -> bool {
        let end = (segment + 1) % self.points.len();
        self.is_arc_segment(segment) && !self.is_arc_start(segment) && !self.is_arc_end(end)
    }

    /// Vertex closest to the line through `seg`, with its distance.
    #[must_use]
    pub fn nearest_point_to_segment(&self, seg: &Segment) -> Option<(Point, Coord)> {
        self.points
            .iter()
            .map(|p| (*p, seg.line_distance(p, false)))
            .min_by_key(|(_, d)| *d)
    }

    /// Index of the first vertex within `threshold` of `p` (exact match for zero).
    #[must_use]
    pub fn find(&self, p: &Point, threshold: Coord) -> Option<usize> {
        if threshold == 0 {
            return self.points.iter().position(|v| v == p);
        }
        let limit = f64::from(threshold);
        self.points.iter().position(|v| distance(v, p) <= limit)
    }

    /// Index of the first segment within `threshold` of `p`.
    #[must_use]
    pub fn find_segment(&self, p: &Point, threshold: Coord) -> Option<usize> {
        self.segments().position(|s| s.distance(p) <= threshold)
    }

    /// Path length from the first vertex to `p`, assumed to lie on `segment`.
    ///
    /// Without a segment index, the first segment passing within one unit of
    /// `p` is used. Returns `None` if no such segment exists.
    #[must_use]
    pub fn path_length(&self, p: &Point, segment: Option<usize>) -> Option<f64> {
        let count = self.segment_count();
        let index = match segment {
            Some(i) if i < count => i,
            Some(i) if i == count && count > 0 => count - 1,
            Some(_) => return None,
            None => self.find_segment(p, 1)?,
        };
        let before: f64 = self.segments().take(index).map(|s| s.length()).sum();
        Some(before + distance(&self.points[index], p))
    }

    /// Point reached after travelling `length` along the chain.
    ///
    /// Non-positive lengths give the first vertex, overlong ones the last.
    #[must_use]
    pub fn point_along(&self, length: f64) -> Option<Point> {
        let first = *self.points.first()?;
        if length <= 0.0 {
            return Some(first);
        }
        let mut travelled = 0.0;
        for seg in self.segments() {
            let l = seg.length();
            if travelled + l >= length {
                let t = (length - travelled) / l;
                let (a, b) = (to_point2(&seg.a), to_point2(&seg.b));
                return Some(round_point(&(a + (b - a) * t)));
            }
            travelled += l;
        }
        self.points.last().copied()
    }

    /// Intersections with a lone segment, sorted by distance from `seg.a`.
    #[must_use]
    pub fn intersect_segment(&self, seg: &Segment) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = self
            .segments()
            .enumerate()
            .filter_map(|(i, s)| {
                s.intersect(seg).map(|point| Intersection {
                    point,
                    index_ours: i,
                    index_theirs: None,
                    is_corner_ours: false,
                    is_corner_theirs: false,
                })
            })
            .collect();
        hits.sort_by_key(|h| squared_distance(&h.point, &seg.a));
        hits
    }

    /// All intersections with another chain.
    ///
    /// See [`ChainIntersect`] for the reporting rules.
    #[must_use]
    pub fn intersect_chain(&self, other: &LineChain, exclude_collinear: bool) -> Vec<Intersection> {
        ChainIntersect::new(self, other)
            .exclude_collinear(exclude_collinear)
            .execute()
            .intersections
    }

    /// Returns `true` if the two chains touch or cross anywhere.
    #[must_use]
    pub fn intersects(&self, other: &LineChain) -> bool {
        !self.intersect_chain(other, false).is_empty()
    }

    /// The first self-intersection found, if any.
    #[must_use]
    pub fn self_intersecting(&self) -> Option<Intersection> {
        SelfIntersect::new(self).execute()
    }

    /// Compares vertex geometry after simplifying both chains.
    ///
    /// Arc overlays, width and the closed flag are ignored.
    #[must_use]
    pub fn compare_geometry(&self, other: &LineChain) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.simplify(true);
        b.simplify(true);
        a.points == b.points
    }

    /// Iterates over the logical pieces: straight segments and whole arcs.
    pub fn shapes(&self) -> impl Iterator<Item = ChainShape<'_>> + '_ {
        let count = self.segment_count();
        let mut segment = 0;
        std::iter::from_fn(move || {
            if segment >= count {
                return None;
            }
            match self.arc_of_segment(segment) {
                Some(arc) => {
                    while segment < count && self.arc_of_segment(segment) == Some(arc) {
                        segment += 1;
                    }
                    Some(ChainShape::Arc(&self.arcs[arc]))
                }
                None => {
                    segment += 1;
                    Some(ChainShape::Segment(self.segment_at(segment - 1)))
                }
            }
        })
    }

    /// Number of logical pieces.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes().count()
    }

    /// Vertex where the next shape begins (or, backwards, where the current
    /// one starts), treating a whole arc as one step.
    ///
    /// Returns `None` at the ends of the chain or for an out-of-range index.
    #[must_use]
    pub fn next_shape(&self, index: usize, forwards: bool) -> Option<usize> {
        let n = self.points.len();
        if index >= n || (forwards && index == n - 1) || (!forwards && index == 0) {
            return None;
        }

        if forwards {
            let Some(arc) = self.arc_of_segment(index) else {
                return Some(index + 1);
            };
            let mut i = index;
            while i + 1 < n && self.arc_of_segment(i) == Some(arc) {
                i += 1;
            }
            Some(i)
        } else {
            let Some(arc) = self.arc_of_segment(index - 1) else {
                return Some(index - 1);
            };
            let mut i = index;
            while i > 0 && self.arc_of_segment(i - 1) == Some(arc) {
                i -= 1;
            }
            Some(i)
        }
    }
}

fn within(dist_sq: ECoord, clearance: Coord) -> bool {
    let clearance = ECoord::from(clearance);
    dist_sq == 0 || dist_sq < clearance * clearance
}

#[allow(clippy::cast_precision_loss)]
fn sqrt_coord(dist_sq: ECoord) -> Coord {
    round_coord((dist_sq as f64).sqrt())
}

/// Point on `s` closest to `other`.
fn nearest_to_segment(s: &Segment, other: &Segment) -> Point {
    if let Some(p) = s.intersect(other) {
        return p;
    }
    [
        s.nearest_point(&other.a),
        s.nearest_point(&other.b),
        s.a,
        s.b,
    ]
    .into_iter()
    .min_by_key(|c| other.squared_distance(c))
    .unwrap_or(s.a)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::tessellation::TessellationParams;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn square() -> LineChain {
        LineChain::from_points(&[pt(0, 0), pt(10, 0), pt(10, 10), pt(0, 10)], true)
    }

    fn arc_chain() -> LineChain {
        let mut chain = LineChain::from_points(&[pt(-2000, 0), pt(-1000, 0)], false);
        let arc = Arc::from_three_points(pt(-1000, 0), pt(0, 1000), pt(1000, 0), 0).unwrap();
        chain.append_arc_with(&arc, &TessellationParams::with_max_error(10.0));
        chain.append_point(pt(2000, 0));
        chain
    }

    #[test]
    fn square_containment_and_edges() {
        let sq = square();
        assert!(sq.point_inside(&pt(5, 5), 0));
        assert!(!sq.point_inside(&pt(15, 5), 0));
        assert!(sq.point_inside(&pt(0, 5), 0));
        assert!(!sq.point_inside(&pt(10, 5), 0));
        assert!(!sq.point_inside(&pt(10, 5), 1));
        assert!(sq.point_inside(&pt(10, 5), 2));
        assert!(sq.point_on_edge(&pt(10, 5), 0));
        assert_eq!(sq.edge_containing_point(&pt(5, 0), 0), Some(0));
        assert_eq!(sq.edge_containing_point(&pt(0, 5), 0), Some(3));
    }

    #[test]
    fn open_chain_contains_nothing() {
        let open = square().with_closed(false);
        assert!(!open.point_inside(&pt(5, 5), 0));
        assert_abs_diff_eq!(open.area(), 0.0);
    }

    #[test]
    fn area_sign_follows_orientation() {
        assert_abs_diff_eq!(square().area(), 100.0);
        assert_abs_diff_eq!(square().reversed().area(), -100.0);
    }

    #[test]
    fn distance_inside_and_outline() {
        let sq = square();
        assert_eq!(sq.squared_distance(&pt(5, 5), false), Some(0));
        assert_eq!(sq.squared_distance(&pt(5, 5), true), Some(25));
        assert_abs_diff_eq!(sq.distance(&pt(13, 14), false).unwrap(), 5.0);
        assert!(LineChain::new().distance(&pt(0, 0), false).is_none());
        let single = LineChain::from_points(&[pt(3, 4)], false);
        assert_eq!(single.squared_distance(&pt(0, 0), false), Some(25));
    }

    #[test]
    fn collide_reports_location() {
        let open = square().with_closed(false);
        let hit = open.collide(&pt(5, -3), 4).unwrap();
        assert_eq!(hit.actual, 3);
        assert_eq!(hit.location, pt(5, 0));
        assert!(open.collide(&pt(5, -3), 3).is_none());
        let inside = square().collide(&pt(5, 5), 0).unwrap();
        assert_eq!(inside.actual, 0);
    }

    #[test]
    fn collide_with_segment() {
        let open = square().with_closed(false);
        let seg = Segment::new(pt(-5, -2), pt(15, -2));
        let hit = open.collide_segment(&seg, 3).unwrap();
        assert_eq!(hit.actual, 2);
        assert!(open.collide_segment(&seg, 2).is_none());
    }

    #[test]
    fn clearance_checks() {
        let sq = square();
        assert!(sq.check_clearance(&pt(5, 2), 2));
        assert!(!sq.check_clearance(&pt(5, 5), 2));
        assert!(sq.check_clearance(&pt(10, 10), 0));
    }

    #[test]
    fn find_vertices_and_segments() {
        let sq = square();
        assert_eq!(sq.find(&pt(10, 0), 0), Some(1));
        assert_eq!(sq.find(&pt(11, 0), 0), None);
        assert_eq!(sq.find(&pt(11, 0), 1), Some(1));
        assert_eq!(sq.find_segment(&pt(10, 5), 0), Some(1));
        assert_eq!(sq.nearest_segment(&pt(5, 9)), Some(2));
    }

    #[test]
    fn nearest_point_snaps_to_arc_endpoints() {
        let chain = arc_chain();
        // Just above the arc's first tessellation segment.
        let second = chain.point(2);
        let query = pt(second.x - 5, second.y + 5);
        assert!(chain.is_arc_start(1));
        assert_eq!(chain.nearest_point(&query, false), Some(pt(-1000, 0)));
        assert_ne!(chain.nearest_point(&query, true), Some(pt(-1000, 0)));

        let free = chain.nearest_point(&pt(-1500, 10), false).unwrap();
        assert_eq!(free, pt(-1500, 0));
    }

    #[test]
    fn nearest_vertex_to_line() {
        let sq = square();
        let (p, d) = sq
            .nearest_point_to_segment(&Segment::new(pt(0, 20), pt(10, 20)))
            .unwrap();
        assert_eq!(p, pt(10, 10));
        assert_eq!(d, 10);
    }

    #[test]
    fn path_length_and_point_along() {
        let open = square().with_closed(false);
        assert_abs_diff_eq!(open.path_length(&pt(10, 4), None).unwrap(), 14.0);
        assert_abs_diff_eq!(open.path_length(&pt(10, 4), Some(1)).unwrap(), 14.0);
        assert_eq!(open.point_along(14.0), Some(pt(10, 4)));
        assert_eq!(open.point_along(-1.0), Some(pt(0, 0)));
        assert_eq!(open.point_along(1000.0), Some(pt(0, 10)));
        assert!(LineChain::new().point_along(1.0).is_none());
    }

    #[test]
    fn length_uses_true_arc_length() {
        let chain = arc_chain();
        let expected = 1000.0 + std::f64::consts::PI * 1000.0 + 1000.0;
        assert_abs_diff_eq!(chain.length(), expected, epsilon = 1e-6);
    }

    #[test]
    fn intersect_segment_sorted_from_origin() {
        let sq = square();
        let hits = sq.intersect_segment(&Segment::new(pt(15, 5), pt(-5, 5)));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].point, pt(10, 5));
        assert_eq!(hits[0].index_ours, 1);
        assert_eq!(hits[1].point, pt(0, 5));
        assert_eq!(hits[1].index_theirs, None);
    }

    #[test]
    fn compare_geometry_ignores_redundant_vertices() {
        let a = square();
        let b = LineChain::from_points(
            &[pt(0, 0), pt(5, 0), pt(10, 0), pt(10, 10), pt(0, 10)],
            true,
        );
        assert!(a.compare_geometry(&b));
        assert!(!a.compare_geometry(&b.reversed()));
    }

    #[test]
    fn shapes_group_arcs() {
        let chain = arc_chain();
        let shapes: Vec<_> = chain.shapes().collect();
        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], ChainShape::Segment(_)));
        assert!(matches!(shapes[1], ChainShape::Arc(_)));
        assert_eq!(
            shapes[2],
            ChainShape::Segment(Segment::new(pt(1000, 0), pt(2000, 0)))
        );
        assert_eq!(chain.shape_count(), 3);
        assert_eq!(square().shape_count(), 4);
    }

    #[test]
    fn next_shape_steps_over_arcs() {
        let chain = arc_chain();
        let last_arc_vertex = chain.point_count() - 2;
        assert_eq!(chain.next_shape(0, true), Some(1));
        assert_eq!(chain.next_shape(1, true), Some(last_arc_vertex));
        assert_eq!(chain.next_shape(last_arc_vertex, false), Some(1));
        assert_eq!(chain.next_shape(last_arc_vertex, true), Some(last_arc_vertex + 1));
        assert_eq!(chain.next_shape(last_arc_vertex + 1, true), None);
        assert_eq!(chain.next_shape(0, false), None);
    }
}
