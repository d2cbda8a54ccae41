mod detect_arcs;
mod edit;
mod format;
mod inside_tracker;
mod query;
mod simplify;

pub use inside_tracker::PointInsideTracker;
pub use query::Collision;

use std::ops::Range;
use std::sync::OnceLock;

use crate::error::{IndexError, InvariantError, Result};
use crate::math::{Box2, Coord, Point};
use crate::tessellation::TessellationParams;

use super::arc::Arc;
use super::segment::Segment;

/// Arc membership of a single chain vertex.
///
/// - both slots empty: a plain polyline vertex;
/// - `first` only: a vertex of that arc;
/// - both set: a shared vertex where arc `first` ends and arc `second` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShapeRef {
    first: Option<usize>,
    second: Option<usize>,
}

impl ShapeRef {
    /// A plain vertex.
    pub const POINT: Self = Self {
        first: None,
        second: None,
    };

    /// A vertex belonging to one arc.
    #[must_use]
    pub fn arc(index: usize) -> Self {
        Self {
            first: Some(index),
            second: None,
        }
    }

    /// A vertex where arc `ending` ends and arc `starting` begins.
    #[must_use]
    pub fn shared(ending: usize, starting: usize) -> Self {
        Self {
            first: Some(ending),
            second: Some(starting),
        }
        .normalized()
    }

    /// The first (or only) arc this vertex belongs to.
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.first
    }

    /// The arc starting at a shared vertex.
    #[must_use]
    pub fn second(&self) -> Option<usize> {
        self.second
    }

    /// Returns `true` for a plain vertex.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    /// Returns `true` for a vertex shared by two arcs.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// Returns `true` if either slot references `arc`.
    #[must_use]
    pub fn contains(&self, arc: usize) -> bool {
        self.first == Some(arc) || self.second == Some(arc)
    }

    /// The arc that continues after this vertex, if any.
    #[must_use]
    pub fn outgoing(&self) -> Option<usize> {
        self.second.or(self.first)
    }

    /// All arc indices referenced by this vertex.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.first.into_iter().chain(self.second)
    }

    fn map(self, f: &impl Fn(usize) -> Option<usize>) -> Self {
        Self {
            first: self.first.and_then(f),
            second: self.second.and_then(f),
        }
        .normalized()
    }

    fn offset(self, by: usize) -> Self {
        self.map(&|i| Some(i + by))
    }

    fn swapped(self) -> Self {
        if self.is_shared() {
            Self {
                first: self.second,
                second: self.first,
            }
        } else {
            self
        }
    }

    fn normalized(self) -> Self {
        match (self.first, self.second) {
            (None, Some(b)) => Self::arc(b),
            (Some(a), Some(b)) if a == b => Self::arc(a),
            _ => self,
        }
    }
}

/// A hit reported by the chain intersection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    /// Intersection point.
    pub point: Point,
    /// Segment index on this chain.
    pub index_ours: usize,
    /// Segment index on the other chain, if one was involved.
    pub index_theirs: Option<usize>,
    /// The point coincides with a vertex of this chain.
    pub is_corner_ours: bool,
    /// The point coincides with a vertex of the other chain.
    pub is_corner_theirs: bool,
}

/// A logical piece of a chain: a straight segment or a whole arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChainShape<'a> {
    Segment(Segment),
    Arc(&'a Arc),
}

/// An ordered, optionally closed sequence of vertices with an arc overlay.
///
/// Every vertex is stored explicitly in `points`; arcs live in a separate list
/// and are attached to runs of vertices through the per-vertex [`ShapeRef`].
/// Generic polyline algorithms therefore work on any chain by treating the
/// tessellated arc vertices as ordinary vertices.
///
/// Invariants kept by every mutation:
/// - `points` and `shapes` have the same length;
/// - every referenced arc exists and every arc is referenced;
/// - the vertices of one arc form a contiguous index range;
/// - a shared vertex never references the same arc twice.
#[derive(Debug, Clone, Default)]
pub struct LineChain {
    points: Vec<Point>,
    shapes: Vec<ShapeRef>,
    arcs: Vec<Arc>,
    closed: bool,
    width: Coord,
    bbox: OnceLock<Option<Box2>>,
}

impl PartialEq for LineChain {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
            && self.shapes == other.shapes
            && self.arcs == other.arcs
            && self.closed == other.closed
            && self.width == other.width
    }
}

impl FromIterator<Point> for LineChain {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        let mut chain = Self::new();
        for p in iter {
            chain.append_point(p);
        }
        chain
    }
}

impl LineChain {
    /// Creates an empty open chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain of plain vertices.
    #[must_use]
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        Self {
            points: points.to_vec(),
            shapes: vec![ShapeRef::POINT; points.len()],
            closed,
            ..Self::default()
        }
    }

    /// Creates an open chain from a flat `x0, y0, x1, y1, ...` list.
    ///
    /// Consecutive duplicates are dropped; a trailing odd coordinate is ignored.
    #[must_use]
    pub fn from_coords(coords: &[Coord]) -> Self {
        coords
            .chunks_exact(2)
            .map(|c| Point::new(c[0], c[1]))
            .collect()
    }

    /// Creates an open chain from consecutive segments.
    ///
    /// A segment whose start matches the previous end continues the chain;
    /// otherwise both endpoints are appended.
    #[must_use]
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut chain = Self::new();
        for seg in segments {
            chain.append_point(seg.a);
            chain.append_point_with(seg.b, true);
        }
        chain
    }

    /// Tessellates an arc into a new chain with default parameters.
    #[must_use]
    pub fn from_arc(arc: &Arc) -> Self {
        Self::from_arc_with(arc, &TessellationParams::default())
    }

    /// Tessellates an arc into a new chain.
    #[must_use]
    pub fn from_arc_with(arc: &Arc, params: &TessellationParams) -> Self {
        let points: Vec<Point> = arc.tessellate(params).collect();
        Self {
            shapes: vec![ShapeRef::arc(0); points.len()],
            points,
            arcs: vec![arc.clone()],
            width: arc.width(),
            ..Self::default()
        }
    }

    /// Builder-style setter for the closed flag.
    #[must_use]
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Number of vertices.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the chain has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Vertex at `index`; negative indices count from the end.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[must_use]
    pub fn point(&self, index: isize) -> Point {
        match self.get_point(index) {
            Some(p) => p,
            None => panic!("point index {index} out of range for {} points", self.points.len()),
        }
    }

    /// Vertex at `index`, or `None` if out of range; negative indices count from the end.
    #[must_use]
    pub fn get_point(&self, index: isize) -> Option<Point> {
        resolve(index, self.points.len()).map(|i| self.points[i])
    }

    /// Per-vertex arc membership, parallel to [`LineChain::points`].
    #[must_use]
    pub fn shape_refs(&self) -> &[ShapeRef] {
        &self.shapes
    }

    /// Number of segments, including the closing segment of a closed chain.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Segment at `index`; negative indices count from the end.
    ///
    /// The closing segment of a closed chain is the last one.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[must_use]
    pub fn segment(&self, index: isize) -> Segment {
        match self.get_segment(index) {
            Some(s) => s,
            None => panic!(
                "segment index {index} out of range for {} segments",
                self.segment_count()
            ),
        }
    }

    /// Segment at `index`, or `None` if out of range.
    #[must_use]
    pub fn get_segment(&self, index: isize) -> Option<Segment> {
        resolve(index, self.segment_count()).map(|i| self.segment_at(i))
    }

    /// Iterates over all segments, closing segment included.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).map(|i| self.segment_at(i))
    }

    /// Single place that knows about the implicit closing segment.
    fn segment_at(&self, index: usize) -> Segment {
        let next = if index + 1 == self.points.len() {
            0
        } else {
            index + 1
        };
        Segment::new(self.points[index], self.points[next])
    }

    /// Number of arcs in the overlay.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// All arcs in the overlay.
    #[must_use]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Arc at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[must_use]
    pub fn arc(&self, index: usize) -> &Arc {
        &self.arcs[index]
    }

    /// Returns `true` if the chain has an implicit closing segment.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sets the closed flag.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Uniform stroke width, for rendering only.
    #[must_use]
    pub fn width(&self) -> Coord {
        self.width
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: Coord) {
        self.width = width;
        self.invalidate_bbox();
    }

    /// Cached bounding box including half the stroke width; `None` when empty.
    #[must_use]
    pub fn bbox(&self) -> Option<Box2> {
        *self.bbox.get_or_init(|| {
            Box2::from_points(&self.points).map(|b| b.inflate(self.width / 2))
        })
    }

    /// Bounding box grown by an extra clearance.
    #[must_use]
    pub fn bbox_with_clearance(&self, clearance: Coord) -> Option<Box2> {
        self.bbox().map(|b| b.inflate(clearance))
    }

    /// Returns `true` if the vertex belongs to at least one arc.
    #[must_use]
    pub fn is_point_on_arc(&self, index: usize) -> bool {
        self.shapes.get(index).is_some_and(|s| s.first.is_some())
    }

    /// Returns `true` if the vertex is shared by two arcs.
    #[must_use]
    pub fn is_shared_point(&self, index: usize) -> bool {
        self.shapes.get(index).is_some_and(ShapeRef::is_shared)
    }

    /// The arc that continues from this vertex (the starting arc of a shared vertex).
    #[must_use]
    pub fn arc_index(&self, index: usize) -> Option<usize> {
        self.shapes.get(index).and_then(ShapeRef::outgoing)
    }

    /// Returns `true` if the segment lies on an arc rather than being a straight piece.
    #[must_use]
    pub fn is_arc_segment(&self, segment: usize) -> bool {
        self.arc_of_segment(segment).is_some()
    }

    /// Index of the arc the segment belongs to, if any.
    ///
    /// The closing segment of a closed chain is always straight.
    #[must_use]
    pub fn arc_of_segment(&self, segment: usize) -> Option<usize> {
        if segment + 1 >= self.points.len() {
            return None;
        }
        let arc = self.shapes[segment].outgoing()?;
        (self.shapes[segment + 1].first == Some(arc)).then_some(arc)
    }

    /// Returns `true` if an arc starts at this vertex.
    #[must_use]
    pub fn is_arc_start(&self, index: usize) -> bool {
        let Some(arc) = self.arc_index(index) else {
            return false;
        };
        if self.is_shared_point(index) || index == 0 {
            return true;
        }
        self.shapes[index - 1].outgoing() != Some(arc)
    }

    /// Returns `true` if an arc ends at this vertex.
    #[must_use]
    pub fn is_arc_end(&self, index: usize) -> bool {
        let Some(arc) = self.shapes.get(index).and_then(|s| s.first) else {
            return false;
        };
        if self.is_shared_point(index) {
            return true;
        }
        self.shapes
            .get(index + 1)
            .is_none_or(|next| next.first != Some(arc))
    }

    /// Checks the structural invariants of the chain.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::Violation`] describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(InvariantError::Violation(msg).into());

        if self.points.len() != self.shapes.len() {
            return violation(format!(
                "{} points but {} shape refs",
                self.points.len(),
                self.shapes.len()
            ));
        }

        // (first vertex, last vertex, vertex count) per arc.
        let mut spans: Vec<Option<(usize, usize, usize)>> = vec![None; self.arcs.len()];
        for (i, sh) in self.shapes.iter().enumerate() {
            if sh.first.is_none() && sh.second.is_some() {
                return violation(format!("vertex {i} has a second arc but no first"));
            }
            if sh.first.is_some() && sh.first == sh.second {
                return violation(format!("vertex {i} references the same arc twice"));
            }
            for arc in sh.indices() {
                let Some(span) = spans.get_mut(arc) else {
                    return violation(format!(
                        "vertex {i} references arc {arc} of {}",
                        self.arcs.len()
                    ));
                };
                *span = Some(match *span {
                    None => (i, i, 1),
                    Some((lo, _, count)) => (lo, i, count + 1),
                });
            }
        }

        for (arc, span) in spans.iter().enumerate() {
            match span {
                None => return violation(format!("arc {arc} is not referenced by any vertex")),
                Some((lo, hi, count)) if hi - lo + 1 != *count => {
                    return violation(format!("vertices of arc {arc} are not contiguous"));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "{:?}",
            self.check_invariants()
        );
    }

    /// Resolves a possibly negative vertex index.
    fn vertex_index(&self, index: isize) -> Result<usize> {
        resolve(index, self.points.len()).ok_or_else(|| {
            IndexError::OutOfRange {
                index,
                len: self.points.len(),
            }
            .into()
        })
    }

    /// Replaces `range` of the vertex list, keeping points and shape refs in lockstep.
    fn splice_vertices<I>(&mut self, range: Range<usize>, replacement: I)
    where
        I: IntoIterator<Item = (Point, ShapeRef)>,
    {
        let (points, shapes): (Vec<Point>, Vec<ShapeRef>) = replacement.into_iter().unzip();
        self.points.splice(range.clone(), points).for_each(drop);
        self.shapes.splice(range, shapes).for_each(drop);
        self.invalidate_bbox();
    }

    fn invalidate_bbox(&mut self) {
        self.bbox = OnceLock::new();
    }

    /// Appends a vertex, growing the cached bounding box in place.
    fn push_vertex(&mut self, p: Point, shape: ShapeRef) {
        self.points.push(p);
        self.shapes.push(shape);
        if let Some(Some(bbox)) = self.bbox.get_mut() {
            bbox.merge(&Box2::from_point(p).inflate(self.width / 2));
            return;
        }
        self.invalidate_bbox();
    }

    /// Applies `f` to every arc reference; `None` clears the reference.
    fn remap_arcs(&mut self, f: impl Fn(usize) -> Option<usize>) {
        for sh in &mut self.shapes {
            *sh = sh.map(&f);
        }
    }

    /// Drops an arc from the overlay, leaving its vertices as a plain polyline,
    /// and compacts the indices of the arcs after it.
    fn convert_arc(&mut self, arc: usize) {
        if arc >= self.arcs.len() {
            return;
        }
        tracing::debug!(arc, arcs = self.arcs.len(), "converting arc to polyline");
        self.remap_arcs(|i| match i.cmp(&arc) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        });
        self.arcs.remove(arc);
    }

    /// Converts several arcs, highest index first so the others stay valid.
    fn convert_arcs(&mut self, mut arcs: Vec<usize>) {
        arcs.sort_unstable_by(|a, b| b.cmp(a));
        arcs.dedup();
        for arc in arcs {
            self.convert_arc(arc);
        }
    }

    /// Arcs referenced by any vertex in `range`.
    fn arcs_in(&self, range: Range<usize>) -> Vec<usize> {
        self.shapes[range].iter().flat_map(ShapeRef::indices).collect()
    }

    /// Inclusive vertex range covered by `arc`.
    fn arc_span(&self, arc: usize) -> Option<(usize, usize)> {
        let lo = self.shapes.iter().position(|s| s.contains(arc))?;
        let hi = self.shapes.iter().rposition(|s| s.contains(arc))?;
        Some((lo, hi))
    }
}

/// Resolves a possibly negative index against `len`.
fn resolve(index: isize, len: usize) -> Option<usize> {
    let len = isize::try_from(len).ok()?;
    let i = if index < 0 { index + len } else { index };
    if (0..len).contains(&i) {
        usize::try_from(i).ok()
    } else {
        None
    }
}
