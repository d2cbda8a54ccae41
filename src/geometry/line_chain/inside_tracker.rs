use crate::math::intersect_2d::cross;
use crate::math::{delta, Point};

use super::LineChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Outside,
    Inside,
    OnEdge,
}

impl Crossing {
    fn flip(self) -> Self {
        match self {
            Self::Outside => Self::Inside,
            Self::Inside => Self::Outside,
            Self::OnEdge => Self::OnEdge,
        }
    }
}

/// Even-odd containment test fed one polyline at a time.
///
/// The polylines are treated as consecutive pieces of a single closed
/// outline: each new piece continues from the last vertex seen, and the
/// outline is closed back to the very first vertex when the result is read.
/// A query point lying on the outline is reported as not inside; see
/// [`PointInsideTracker::is_on_edge`].
#[derive(Debug, Clone)]
pub struct PointInsideTracker {
    point: Point,
    first: Option<Point>,
    last: Option<Point>,
    state: Crossing,
}

impl PointInsideTracker {
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self {
            point,
            first: None,
            last: None,
            state: Crossing::Outside,
        }
    }

    /// Feeds the vertices of `polyline` into the outline.
    pub fn add_polyline(&mut self, polyline: &LineChain) {
        for p in polyline.points() {
            if self.state == Crossing::OnEdge {
                return;
            }
            match self.last {
                None => self.first = Some(*p),
                Some(last) => self.process_edge(last, *p),
            }
            self.last = Some(*p);
        }
    }

    /// Whether the query point lies strictly inside the closed outline.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.closed_state() == Crossing::Inside
    }

    /// Whether the query point was found on the outline.
    #[must_use]
    pub fn is_on_edge(&self) -> bool {
        self.closed_state() == Crossing::OnEdge
    }

    fn closed_state(&self) -> Crossing {
        let mut closed = self.clone();
        if let (Some(last), Some(first)) = (self.last, self.first) {
            if closed.state != Crossing::OnEdge {
                closed.process_edge(last, first);
            }
        }
        closed.state
    }

    fn process_edge(&mut self, ip: Point, next: Point) {
        let p = self.point;

        if next.y == p.y && (next.x == p.x || (ip.y == p.y && (next.x > p.x) == (ip.x < p.x))) {
            self.state = Crossing::OnEdge;
            return;
        }

        if (ip.y < p.y) == (next.y < p.y) {
            return;
        }

        if ip.x >= p.x && next.x > p.x {
            self.state = self.state.flip();
            return;
        }
        if ip.x < p.x && next.x <= p.x {
            return;
        }

        let d = cross(delta(&p, &ip), delta(&p, &next));
        if d == 0 {
            self.state = Crossing::OnEdge;
        } else if (d > 0) == (next.y > ip.y) {
            self.state = self.state.flip();
        }
    }
}
