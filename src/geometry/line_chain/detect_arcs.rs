use std::f64::consts::PI;

use crate::error::Result;
use crate::geometry::arc::Arc;
use crate::math::arc_2d::{angle_of, arc_point_at, sweep_between};
use crate::math::{round_point, to_point2, Coord, Point};

use super::{LineChain, ShapeRef};

impl LineChain {
    /// Rebuilds the arc overlay by matching vertex runs against candidate arcs.
    ///
    /// The existing overlay is discarded. Scanning forward, the first candidate
    /// that passes within `margin` of two consecutive vertices claims the
    /// longest run of vertices near it. A run whose ends coincide with the
    /// candidate's ends (in either direction) reuses the candidate; otherwise a
    /// new arc is fitted through the run's ends projected onto the candidate's
    /// circle. The vertices themselves are not moved. Consecutive runs share
    /// their junction vertex.
    pub fn detect_arcs(&mut self, candidates: &[Arc], margin: Coord) {
        self.arcs.clear();
        self.shapes.fill(ShapeRef::POINT);

        let n = self.points.len();
        let mut i = 0;
        while i + 1 < n {
            match self.match_run(i, candidates, margin) {
                Some((end, arc)) => {
                    self.attach_arc(i, end, arc);
                    i = end;
                }
                None => i += 1,
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            detected = self.arcs.len(),
            "detected arcs"
        );
        self.debug_check();
    }

    /// Finds the run starting at `start` claimed by the first matching candidate.
    fn match_run(&self, start: usize, candidates: &[Arc], margin: Coord) -> Option<(usize, Arc)> {
        let limit = f64::from(margin);
        let n = self.points.len();

        for candidate in candidates {
            let near = |p: &Point| candidate.distance(p) <= limit;
            if !near(&self.points[start]) || !near(&self.points[start + 1]) {
                continue;
            }
            let mut end = start + 1;
            while end + 1 < n && near(&self.points[end + 1]) {
                end += 1;
            }

            match fit_arc(candidate, &self.points[start..=end]) {
                Ok(arc) => return Some((end, arc)),
                Err(err) => {
                    tracing::warn!(%err, start, end, "skipping degenerate arc candidate");
                }
            }
        }
        None
    }

    /// Tags `start..=end` with a new arc; the first vertex may already end another arc.
    fn attach_arc(&mut self, start: usize, end: usize, arc: Arc) {
        let index = self.arcs.len();
        for shape in &mut self.shapes[start..=end] {
            *shape = match shape.first() {
                None => ShapeRef::arc(index),
                Some(ending) => ShapeRef::shared(ending, index),
            };
        }
        self.arcs.push(arc);
    }
}

/// Arc describing `run` on the circle of `candidate`.
fn fit_arc(candidate: &Arc, run: &[Point]) -> Result<Arc> {
    let first = run[0];
    let last = run[run.len() - 1];

    if first == candidate.start() && last == candidate.end() {
        return Ok(candidate.clone());
    }
    if first == candidate.end() && last == candidate.start() {
        return Ok(candidate.reversed());
    }

    let start = candidate.nearest_point_on_circle(&first);
    let end = candidate.nearest_point_on_circle(&last);
    let mid = if run.len() > 2 {
        candidate.nearest_point_on_circle(&run[run.len() / 2])
    } else {
        short_way_mid(candidate, &first, &last)
    };
    Arc::from_three_points(start, mid, end, candidate.width())
}

/// Midpoint of the shorter way around the candidate's circle from `a` to `b`.
fn short_way_mid(candidate: &Arc, a: &Point, b: &Point) -> Point {
    let center = candidate.center();
    let from = angle_of(&center, &to_point2(a));
    let to = angle_of(&center, &to_point2(b));
    let mut sweep = sweep_between(from, to, true);
    if sweep > PI {
        sweep = sweep_between(from, to, false);
    }
    round_point(&arc_point_at(&center, candidate.radius(), from, sweep, 0.5))
}
