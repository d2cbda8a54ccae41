use crate::geometry::segment::Segment;
use crate::math::{Point, COLLINEAR_TOLERANCE};

use super::{LineChain, ShapeRef};

impl LineChain {
    /// Removes consecutive duplicate vertices and, with `remove_collinear`,
    /// plain vertices lying on the line through their neighbours.
    ///
    /// Arc membership wins when duplicates merge, and arc vertices are never
    /// dropped as collinear. Passes repeat until nothing changes, so the result
    /// is a fixed point.
    pub fn simplify(&mut self, remove_collinear: bool) -> &mut Self {
        let before = self.points.len();
        loop {
            let len = self.points.len();
            self.merge_duplicates();
            if remove_collinear {
                self.drop_collinear();
            }
            if self.points.len() == len {
                break;
            }
        }
        tracing::trace!(before, after = self.points.len(), "simplified chain");
        self.debug_check();
        self
    }

    fn merge_duplicates(&mut self) {
        let n = self.points.len();
        let mut merged: Vec<(Point, ShapeRef)> = Vec::with_capacity(n);
        for (p, shape) in self.points.iter().zip(&self.shapes) {
            if let Some((last_p, last_shape)) = merged.last_mut() {
                if last_p == p {
                    if let Some(combined) = merge_refs(*last_shape, *shape) {
                        *last_shape = combined;
                        continue;
                    }
                }
            }
            merged.push((*p, *shape));
        }
        if merged.len() != n {
            self.splice_vertices(0..n, merged);
        }
    }

    fn drop_collinear(&mut self) {
        let n = self.points.len();
        if n < 3 {
            return;
        }

        let mut keep = vec![true; n];
        let mut i = 0;
        while i + 2 < n {
            if !self.shapes[i].is_point() || !self.shapes[i + 1].is_point() {
                i += 1;
                continue;
            }
            let line = Segment::new(self.points[i], self.points[i + 1]);
            let mut k = i;
            while k + 2 < n
                && self.shapes[k + 1].is_point()
                && line.line_distance(&self.points[k + 2], false) <= COLLINEAR_TOLERANCE
            {
                k += 1;
                keep[k] = false;
            }
            i = k + 1;
        }

        if keep.iter().all(|k| *k) {
            return;
        }
        let kept: Vec<_> = self
            .points
            .iter()
            .zip(&self.shapes)
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|((p, s), _)| (*p, *s))
            .collect();
        self.splice_vertices(0..n, kept);
    }
}

/// Combined arc membership of two coincident vertices, if they can merge.
fn merge_refs(a: ShapeRef, b: ShapeRef) -> Option<ShapeRef> {
    if b.indices().all(|i| a.contains(i)) {
        return Some(a);
    }
    if a.indices().all(|i| b.contains(i)) {
        return Some(b);
    }
    // One arc ends exactly where the next one starts.
    match (a.is_shared(), b.is_shared(), a.first(), b.first()) {
        (false, false, Some(ending), Some(starting)) => Some(ShapeRef::shared(ending, starting)),
        _ => None,
    }
}
