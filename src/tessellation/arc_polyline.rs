use crate::math::arc_2d::arc_point_at;
use crate::math::{round_point, Point, Point2};

/// Lazy polyline approximation of a circular arc.
///
/// Yields `segments + 1` points. The first and last points are the arc's exact
/// start and end; interior points are rounded onto the coordinate grid.
/// Cloning the iterator, or calling [`ArcPolyline::restart`], replays the
/// sequence from the beginning.
#[derive(Debug, Clone)]
pub struct ArcPolyline {
    start: Point,
    end: Point,
    center: Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    segments: u32,
    next: u32,
}

impl ArcPolyline {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        start: Point,
        end: Point,
        center: Point2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        segments: u32,
    ) -> Self {
        Self {
            start,
            end,
            center,
            radius,
            start_angle,
            sweep,
            segments: segments.max(1),
            next: 0,
        }
    }

    /// Number of straight segments in the approximation.
    #[must_use]
    pub fn segment_count(&self) -> u32 {
        self.segments
    }

    /// Rewinds the sequence to the arc's start point.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for ArcPolyline {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next > self.segments {
            return None;
        }
        let i = self.next;
        self.next += 1;

        if i == 0 {
            return Some(self.start);
        }
        if i == self.segments {
            return Some(self.end);
        }
        let t = f64::from(i) / f64::from(self.segments);
        Some(round_point(&arc_point_at(
            &self.center,
            self.radius,
            self.start_angle,
            self.sweep,
            t,
        )))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.segments + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcPolyline {}

impl std::iter::FusedIterator for ArcPolyline {}
