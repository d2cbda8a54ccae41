use crate::error::{IndexError, Result};
use crate::geometry::arc::Arc;
use crate::geometry::segment::Segment;
use crate::math::arc_2d::rotate_point;
use crate::math::{
    mirror_coord, round_point, to_point2, translate, Point, Vector, SPLIT_SNAP_DISTANCE,
};
use crate::tessellation::TessellationParams;

use super::{resolve, LineChain, ShapeRef};

impl LineChain {
    /// Appends a plain vertex, skipping it if it repeats the last vertex.
    pub fn append_point(&mut self, p: Point) {
        self.append_point_with(p, false);
    }

    /// Appends a plain vertex, optionally keeping an exact repeat of the last vertex.
    pub fn append_point_with(&mut self, p: Point, allow_duplicate: bool) {
        if !allow_duplicate && self.points.last() == Some(&p) {
            return;
        }
        self.push_vertex(p, ShapeRef::POINT);
        self.debug_check();
    }

    /// Tessellates and appends an arc with default parameters.
    pub fn append_arc(&mut self, arc: &Arc) {
        self.append_arc_with(arc, &TessellationParams::default());
    }

    /// Tessellates and appends an arc.
    ///
    /// If the arc starts exactly at the current last vertex, that vertex joins
    /// the arc (and becomes a shared vertex when it already ends another arc).
    pub fn append_arc_with(&mut self, arc: &Arc, params: &TessellationParams) {
        let mut piece = Self::from_arc_with(arc, params);
        piece.width = self.width;
        self.append_chain(&piece);
    }

    /// Appends all vertices and arcs of `other`.
    ///
    /// A leading vertex of `other` that repeats the current last vertex is
    /// merged into it rather than duplicated; if `other` starts with an arc the
    /// merged vertex picks up that arc reference.
    pub fn append_chain(&mut self, other: &LineChain) {
        if other.is_empty() {
            return;
        }

        let offset = self.arcs.len();
        self.arcs.extend(other.arcs.iter().cloned());

        let first = other.points[0];
        let joined = self.points.last() == Some(&first);
        let leading_arc = other.arc_of_segment(0).map(|a| a + offset);

        match (joined, leading_arc) {
            (true, Some(arc)) if !self.shapes.last().is_some_and(ShapeRef::is_shared) => {
                if let Some(last) = self.shapes.last_mut() {
                    *last = match last.first {
                        None => ShapeRef::arc(arc),
                        Some(ending) => ShapeRef::shared(ending, arc),
                    };
                }
            }
            (true, None) => {}
            _ => self.push_vertex(first, other.shapes[0].offset(offset)),
        }

        for (p, shape) in other.points.iter().zip(&other.shapes).skip(1) {
            self.push_vertex(*p, shape.offset(offset));
        }

        tracing::trace!(
            appended = other.point_count(),
            arcs = other.arc_count(),
            joined,
            "appended chain"
        );
        self.debug_check();
    }

    /// Inserts a plain vertex before `index`.
    ///
    /// An arc whose run would be split by the new vertex is converted to a
    /// plain polyline first.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index > point_count()`.
    pub fn insert_point(&mut self, index: usize, p: Point) -> Result<()> {
        self.check_insert_index(index)?;
        self.unsplit_arc_at(index);
        self.splice_vertices(index..index, [(p, ShapeRef::POINT)]);
        self.debug_check();
        Ok(())
    }

    /// Tessellates `arc` with default parameters and inserts it before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index > point_count()`.
    pub fn insert_arc(&mut self, index: usize, arc: &Arc) -> Result<()> {
        self.insert_arc_with(index, arc, &TessellationParams::default())
    }

    /// Tessellates `arc` and inserts its vertices before `index`.
    ///
    /// The new arc takes the index one past the highest arc referenced before
    /// the insertion point; later arcs shift up by one.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index > point_count()`.
    pub fn insert_arc_with(
        &mut self,
        index: usize,
        arc: &Arc,
        params: &TessellationParams,
    ) -> Result<()> {
        self.check_insert_index(index)?;
        self.unsplit_arc_at(index);

        let arc_pos = self.shapes[..index]
            .iter()
            .flat_map(ShapeRef::indices)
            .max()
            .map_or(0, |m| m + 1);

        self.remap_arcs(|i| Some(if i >= arc_pos { i + 1 } else { i }));
        self.arcs.insert(arc_pos, arc.clone());

        let tag = ShapeRef::arc(arc_pos);
        self.splice_vertices(index..index, arc.tessellate(params).map(|p| (p, tag)));

        tracing::debug!(index, arc = arc_pos, "inserted arc");
        self.debug_check();
        Ok(())
    }

    /// Removes the vertices `start..=end`; negative indices count from the end
    /// and `end` is clamped to the last vertex.
    ///
    /// Every arc with a vertex in the range is converted to a plain polyline
    /// first; arcs lying entirely inside the range disappear with their vertices.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `start` is out of range or `start > end`; the
    /// chain is left unchanged.
    pub fn remove(&mut self, start: isize, end: isize) -> Result<()> {
        let (start, end) = self.resolve_range(start, end)?;
        self.remove_range(start, end);
        self.debug_check();
        Ok(())
    }

    /// Removes a single vertex.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if the index is out of range.
    pub fn remove_point(&mut self, index: isize) -> Result<()> {
        self.remove(index, index)
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let touched = self.arcs_in(start..end + 1);
        self.convert_arcs(touched);
        self.splice_vertices(start..end + 1, std::iter::empty());
        tracing::trace!(start, end, "removed vertices");
    }

    /// Replaces the vertices `start..=end` by a single plain vertex.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `start` is out of range or `start > end`.
    pub fn replace_with_point(&mut self, start: isize, end: isize, p: Point) -> Result<()> {
        let (start, end) = self.resolve_range(start, end)?;
        let touched = self.arcs_in(start..end + 1);
        self.convert_arcs(touched);
        self.splice_vertices(start..end + 1, [(p, ShapeRef::POINT)]);
        self.debug_check();
        Ok(())
    }

    /// Replaces the vertices `start..=end` by the content of `chain`.
    ///
    /// Behaves like [`LineChain::remove`] followed by inserting the vertices of
    /// `chain` at `start`, with its arcs appended to the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `start` is out of range or `start > end`.
    pub fn replace_with_chain(&mut self, start: isize, end: isize, chain: &LineChain) -> Result<()> {
        let (start, end) = self.resolve_range(start, end)?;
        self.remove_range(start, end);

        let offset = self.arcs.len();
        self.arcs.extend(chain.arcs.iter().cloned());
        self.splice_vertices(
            start..start,
            chain
                .points
                .iter()
                .zip(&chain.shapes)
                .map(|(p, s)| (*p, s.offset(offset))),
        );
        self.debug_check();
        Ok(())
    }

    /// Moves a vertex; arcs through it are converted to plain polylines.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if the index is out of range.
    pub fn set_point(&mut self, index: isize, p: Point) -> Result<()> {
        let index = self.vertex_index(index)?;
        let touched = self.arcs_in(index..index + 1);
        self.convert_arcs(touched);
        self.points[index] = p;
        self.invalidate_bbox();
        self.debug_check();
        Ok(())
    }

    /// Removes the whole shape that continues from vertex `index`.
    ///
    /// A plain vertex is simply removed. For an arc, its vertices are removed
    /// except those shared with a neighbouring arc, which stay as that
    /// neighbour's endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if the index is out of range.
    pub fn remove_shape(&mut self, index: isize) -> Result<()> {
        let index = self.vertex_index(index)?;
        let Some((arc, (lo, hi))) = self
            .arc_index(index)
            .and_then(|arc| self.arc_span(arc).map(|span| (arc, span)))
        else {
            self.remove_range(index, index);
            self.debug_check();
            return Ok(());
        };

        let lo = if self.shapes[lo].is_shared() { lo + 1 } else { lo };
        let hi = if self.shapes[hi].is_shared() {
            hi.saturating_sub(1)
        } else {
            hi
        };
        self.convert_arc(arc);
        if lo <= hi {
            self.remove_range(lo, hi);
        }
        self.debug_check();
        Ok(())
    }

    /// Splits the chain at the point nearest to `p`.
    ///
    /// Returns the index of the new vertex, or of an existing vertex within
    /// snapping distance of the split location. Inside an arc the new vertex
    /// is placed on the arc's circle and joins the arc, so the arc and the
    /// chain length are unchanged. Returns `None` for a chain without segments.
    pub fn split(&mut self, p: Point) -> Option<usize> {
        let segment = self.nearest_segment(&p)?;
        let arc = self.arc_of_segment(segment);
        let mut target = self.segment_at(segment).nearest_point(&p);
        if let Some(arc) = arc {
            target = self.arcs[arc].nearest_point_on_circle(&target);
        }

        if let Some(existing) = self.find(&target, SPLIT_SNAP_DISTANCE - 1) {
            tracing::trace!(index = existing, "split snapped to existing vertex");
            return Some(existing);
        }

        let index = segment + 1;
        let shape = arc.map_or(ShapeRef::POINT, ShapeRef::arc);
        self.splice_vertices(index..index, [(target, shape)]);
        tracing::trace!(index, ?arc, "split segment {segment}");
        self.debug_check();
        Some(index)
    }

    /// Reverses the direction of travel, including every arc.
    pub fn reverse(&mut self) {
        let n = self.arcs.len();
        self.points.reverse();
        self.shapes.reverse();
        self.arcs.reverse();
        self.remap_arcs(|i| Some(n - 1 - i));
        for shape in &mut self.shapes {
            *shape = shape.swapped();
        }
        for arc in &mut self.arcs {
            arc.reverse();
        }
        self.debug_check();
    }

    /// Returns a reversed copy.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut chain = self.clone();
        chain.reverse();
        chain
    }

    /// Removes all vertices and arcs; the closed flag and width are kept.
    pub fn clear(&mut self) {
        self.splice_vertices(0..self.points.len(), std::iter::empty());
        self.arcs.clear();
    }

    /// Copies the vertices `start..=end` into a new open chain.
    ///
    /// Arcs lying entirely inside the range are kept; partially covered arcs
    /// degrade to plain vertices.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if `start` is out of range or `start > end`.
    pub fn slice(&self, start: isize, end: isize) -> Result<Self> {
        let (start, end) = self.resolve_range(start, end)?;

        let kept: Vec<usize> = (0..self.arcs.len())
            .filter(|&arc| {
                self.arc_span(arc)
                    .is_some_and(|(lo, hi)| lo >= start && hi <= end)
            })
            .collect();
        let renumber = |i: usize| kept.iter().position(|&k| k == i);

        let shapes = self.shapes[start..=end]
            .iter()
            .map(|s| s.map(&renumber))
            .collect();
        Ok(Self {
            points: self.points[start..=end].to_vec(),
            shapes,
            arcs: kept.iter().map(|&i| self.arcs[i].clone()).collect(),
            width: self.width,
            ..Self::default()
        })
    }

    /// Translates all vertices and arcs.
    pub fn move_by(&mut self, offset: &Vector) {
        for p in &mut self.points {
            *p = translate(p, offset);
        }
        for arc in &mut self.arcs {
            arc.move_by(offset);
        }
        self.invalidate_bbox();
    }

    /// Rotates counter-clockwise by `angle` radians around `about`.
    pub fn rotate(&mut self, angle: f64, about: &Point) {
        let center = to_point2(about);
        for p in &mut self.points {
            *p = round_point(&rotate_point(&to_point2(p), &center, angle));
        }
        for arc in &mut self.arcs {
            arc.rotate(angle, about);
        }
        self.invalidate_bbox();
    }

    /// Mirrors horizontally (`mirror_x`) and/or vertically (`mirror_y`) about `reference`.
    pub fn mirror(&mut self, mirror_x: bool, mirror_y: bool, reference: &Point) {
        for p in &mut self.points {
            if mirror_x {
                p.x = mirror_coord(p.x, reference.x);
            }
            if mirror_y {
                p.y = mirror_coord(p.y, reference.y);
            }
        }
        for arc in &mut self.arcs {
            arc.mirror(mirror_x, mirror_y, reference);
        }
        self.invalidate_bbox();
    }

    /// Mirrors across the line through `axis`.
    pub fn mirror_across(&mut self, axis: &Segment) {
        for p in &mut self.points {
            *p = axis.reflect_point(p);
        }
        for arc in &mut self.arcs {
            arc.mirror_across(axis);
        }
        self.invalidate_bbox();
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        if index > self.points.len() {
            return Err(IndexError::OutOfRange {
                index: isize::try_from(index).unwrap_or(isize::MAX),
                len: self.points.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Converts the arc whose run would be split by inserting before `index`.
    fn unsplit_arc_at(&mut self, index: usize) {
        if index == 0 || index >= self.points.len() {
            return;
        }
        if let Some(arc) = self.arc_of_segment(index - 1) {
            self.convert_arc(arc);
        }
    }

    /// Resolves an inclusive vertex range, clamping `end` to the last vertex.
    fn resolve_range(&self, start: isize, end: isize) -> Result<(usize, usize)> {
        let n = self.points.len();
        let start_idx = self.vertex_index(start)?;
        let end_idx = match resolve(end, n) {
            Some(e) => e,
            None if end >= 0 => n - 1,
            None => {
                return Err(IndexError::OutOfRange { index: end, len: n }.into());
            }
        };
        if start_idx > end_idx {
            return Err(IndexError::InvalidRange {
                start: start_idx,
                end: end_idx,
            }
            .into());
        }
        Ok((start_idx, end_idx))
    }
}
