use crate::math::intersect_2d::{dot, segment_segment_intersect};
use crate::math::{
    delta, narrow, rescale, round_coord, squared_distance, Box2, Coord, ECoord, Point,
};

/// A straight line piece between two integer points.
///
/// Segments of a chain are materialized on demand from consecutive vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    /// Creates a new segment from `a` to `b`.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Returns the segment with its endpoints swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Squared length of the segment.
    #[must_use]
    pub fn squared_length(&self) -> ECoord {
        squared_distance(&self.a, &self.b)
    }

    /// Euclidean length of the segment.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn length(&self) -> f64 {
        (self.squared_length() as f64).sqrt()
    }

    /// Returns the point on the closed segment nearest to `p`.
    #[must_use]
    pub fn nearest_point(&self, p: &Point) -> Point {
        let d = delta(&self.a, &self.b);
        let l_squared = dot(d, d);
        if l_squared == 0 {
            return self.a;
        }

        let t = dot(d, delta(&self.a, p));
        if t < 0 {
            return self.a;
        }
        if t > l_squared {
            return self.b;
        }

        Point::new(
            narrow(ECoord::from(self.a.x) + rescale(t, d.0, l_squared)),
            narrow(ECoord::from(self.a.y) + rescale(t, d.1, l_squared)),
        )
    }

    /// Squared distance from `p` to the closed segment.
    #[must_use]
    pub fn squared_distance(&self, p: &Point) -> ECoord {
        squared_distance(&self.nearest_point(p), p)
    }

    /// Distance from `p` to the closed segment, rounded to the coordinate grid.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(&self, p: &Point) -> Coord {
        round_coord((self.squared_distance(p) as f64).sqrt())
    }

    /// Distance from `p` to the infinite line through the segment.
    ///
    /// With `signed`, points to the left of `a → b` are positive.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn line_distance(&self, p: &Point, signed: bool) -> Coord {
        let qa = ECoord::from(self.a.y) - ECoord::from(self.b.y);
        let qb = ECoord::from(self.b.x) - ECoord::from(self.a.x);
        let len_sq = qa * qa + qb * qb;
        if len_sq == 0 {
            return self.distance(p);
        }
        let qc = -qa * ECoord::from(self.a.x) - qb * ECoord::from(self.a.y);
        let num = qa * ECoord::from(p.x) + qb * ECoord::from(p.y) + qc;
        let dist = num as f64 / (len_sq as f64).sqrt();
        if signed {
            round_coord(dist)
        } else {
            round_coord(dist.abs())
        }
    }

    /// Squared distance between two closed segments; zero if they touch.
    #[must_use]
    pub fn squared_distance_to_segment(&self, other: &Segment) -> ECoord {
        if self.intersect(other).is_some() {
            return 0;
        }
        [
            self.squared_distance(&other.a),
            self.squared_distance(&other.b),
            other.squared_distance(&self.a),
            other.squared_distance(&self.b),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    /// Returns `true` if both endpoints of `other` lie on this segment's carrier line.
    #[must_use]
    pub fn collinear(&self, other: &Segment) -> bool {
        let qa = ECoord::from(self.a.y) - ECoord::from(self.b.y);
        let qb = ECoord::from(self.b.x) - ECoord::from(self.a.x);
        let qc = -qa * ECoord::from(self.a.x) - qb * ECoord::from(self.a.y);

        let side = |p: &Point| (ECoord::from(p.x) * qa + ECoord::from(p.y) * qb + qc).abs();
        side(&other.a) <= 1 && side(&other.b) <= 1
    }

    /// Returns `true` if `p` lies on the segment, within one coordinate unit.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        self.distance(p) <= 1
    }

    /// Intersection point with another segment, endpoints included.
    #[must_use]
    pub fn intersect(&self, other: &Segment) -> Option<Point> {
        self.intersect_with(other, false, false)
    }

    /// Intersection point with another segment.
    ///
    /// See [`segment_segment_intersect`] for the meaning of the flags.
    #[must_use]
    pub fn intersect_with(
        &self,
        other: &Segment,
        ignore_endpoints: bool,
        as_lines: bool,
    ) -> Option<Point> {
        segment_segment_intersect(
            &self.a,
            &self.b,
            &other.a,
            &other.b,
            ignore_endpoints,
            as_lines,
        )
    }

    /// Mirrors `p` across the line through this segment.
    #[must_use]
    pub fn reflect_point(&self, p: &Point) -> Point {
        let d = delta(&self.a, &self.b);
        let l_squared = dot(d, d);
        if l_squared == 0 {
            return *p;
        }
        let t = dot(d, delta(&self.a, p));
        let cx = ECoord::from(self.a.x) + rescale(t, d.0, l_squared);
        let cy = ECoord::from(self.a.y) + rescale(t, d.1, l_squared);
        Point::new(
            narrow(2 * cx - ECoord::from(p.x)),
            narrow(2 * cy - ECoord::from(p.y)),
        )
    }

    /// Bounding box of the segment.
    #[must_use]
    pub fn bbox(&self) -> Box2 {
        Box2::from_corners(self.a, self.b)
    }
}
