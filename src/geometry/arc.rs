use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{
    angle_in_arc_range, angle_of, circumcenter, nearest_point_on_circle, rotate_point,
    sweep_between,
};
use crate::math::distance_2d::point_to_arc_dist;
use crate::math::intersect_2d::cross;
use crate::math::{
    delta, mirror_coord, round_point, to_point2, translate, Box2, Coord, Point, Point2, Vector,
    Vector2, TOLERANCE,
};
use crate::tessellation::{ArcPolyline, TessellationParams};

use super::segment::Segment;

/// A circular arc between two integer points.
///
/// The arc is stored as start, mid and end points on the grid plus the exact
/// (floating-point) center and radius derived when it was constructed. `mid`
/// is any point on the arc strictly between the endpoints and fixes the
/// direction of travel. When `start == end` the arc is a full circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    start: Point,
    mid: Point,
    end: Point,
    center: Point2,
    radius: f64,
    ccw: bool,
    width: Coord,
}

impl Arc {
    /// Creates an arc through three points.
    ///
    /// If `start == end`, the arc is the full circle whose diameter is `start`–`mid`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points are collinear,
    /// coincide, or define a zero radius.
    pub fn from_three_points(start: Point, mid: Point, end: Point, width: Coord) -> Result<Self> {
        let (s, m, e) = (to_point2(&start), to_point2(&mid), to_point2(&end));

        let (center, ccw) = if start == end {
            if mid == start {
                return Err(
                    GeometryError::Degenerate("arc start, mid and end coincide".into()).into(),
                );
            }
            (Point2::from((s.coords + m.coords) * 0.5), true)
        } else {
            let center = circumcenter(&s, &m, &e).ok_or_else(|| {
                GeometryError::Degenerate(format!(
                    "arc points ({}, {}), ({}, {}), ({}, {}) are collinear",
                    start.x, start.y, mid.x, mid.y, end.x, end.y
                ))
            })?;
            let turn = cross(delta(&start, &mid), delta(&mid, &end));
            (center, turn > 0)
        };

        let radius = (s - center).norm();
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }

        Ok(Self {
            start,
            mid,
            end,
            center,
            radius,
            ccw,
            width,
        })
    }

    /// Creates an arc from its center, start point and signed sweep angle (radians).
    ///
    /// A positive sweep runs counter-clockwise. Sweeps beyond a full turn are
    /// clamped to a full circle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if `start == center` or the sweep is zero.
    pub fn from_center(center: Point, start: Point, sweep: f64, width: Coord) -> Result<Self> {
        if start == center {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if !sweep.is_finite() || sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("arc sweep {sweep} is zero")).into());
        }

        let sweep = sweep.clamp(-TAU, TAU);
        let c = to_point2(&center);
        let s = to_point2(&start);
        let mid = round_point(&rotate_point(&s, &c, sweep * 0.5));
        let end = if sweep.abs() >= TAU - TOLERANCE {
            start
        } else {
            round_point(&rotate_point(&s, &c, sweep))
        };

        Ok(Self {
            start,
            mid,
            end,
            center: c,
            radius: (s - c).norm(),
            ccw: sweep > 0.0,
            width,
        })
    }

    /// Start point of the arc.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// A point on the arc between start and end.
    #[must_use]
    pub fn mid(&self) -> Point {
        self.mid
    }

    /// End point of the arc.
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Exact center of the arc's circle.
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Center rounded onto the coordinate grid.
    #[must_use]
    pub fn center_point(&self) -> Point {
        round_point(&self.center)
    }

    /// Radius of the arc's circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Stroke width used downstream for rendering.
    #[must_use]
    pub fn width(&self) -> Coord {
        self.width
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: Coord) {
        self.width = width;
    }

    /// Returns `true` if travelling from start to end runs clockwise.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        !self.ccw
    }

    /// Returns `true` if the arc is a full circle.
    #[must_use]
    pub fn is_circle(&self) -> bool {
        self.start == self.end
    }

    /// Angle of the start point as seen from the center.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        angle_of(&self.center, &to_point2(&self.start))
    }

    /// Angle of the end point as seen from the center.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        angle_of(&self.center, &to_point2(&self.end))
    }

    /// Signed sweep from start to end; positive is counter-clockwise.
    #[must_use]
    pub fn central_angle(&self) -> f64 {
        sweep_between(self.start_angle(), self.end_angle(), self.ccw)
    }

    /// Length along the arc.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.central_angle().abs()
    }

    /// Returns the arc travelled in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            ccw: !self.ccw,
            ..self.clone()
        }
    }

    /// Reverses the arc in place.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.ccw = !self.ccw;
    }

    /// Distance from `p` to the arc (not the full circle).
    #[must_use]
    pub fn distance(&self, p: &Point) -> f64 {
        point_to_arc_dist(
            &to_point2(p),
            &self.center,
            self.radius,
            self.start_angle(),
            self.central_angle(),
        )
    }

    /// Returns `true` if `p` lies within `margin` (plus half the stroke width)
    /// of the arc, inside the arc's angular span.
    #[must_use]
    pub fn collide(&self, p: &Point, margin: Coord) -> bool {
        let reach = f64::from(margin) + f64::from(self.width) * 0.5;
        self.distance(p) <= reach
    }

    /// Returns `true` if `angle` lies within the arc's angular span.
    #[must_use]
    pub fn covers_angle(&self, angle: f64) -> bool {
        angle_in_arc_range(angle, self.start_angle(), self.central_angle())
    }

    /// Projects `p` onto the arc's full circle, rounded onto the grid.
    #[must_use]
    pub fn nearest_point_on_circle(&self, p: &Point) -> Point {
        round_point(&nearest_point_on_circle(
            &self.center,
            self.radius,
            &to_point2(p),
        ))
    }

    /// Bounding box of the arc including half the stroke width.
    #[must_use]
    pub fn bbox(&self) -> Box2 {
        let mut bbox = Box2::from_corners(self.start, self.end);
        let start_angle = self.start_angle();
        let sweep = self.central_angle();
        for k in 0..4 {
            let angle = f64::from(k) * FRAC_PI_2;
            if angle_in_arc_range(angle, start_angle, sweep) {
                let extreme =
                    self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius;
                bbox.merge_point(&round_point(&extreme));
            }
        }
        bbox.inflate(self.width / 2)
    }

    /// Lazily tessellates the arc with default parameters and the given maximum chordal error.
    #[must_use]
    pub fn convert_to_polyline(&self, max_error: f64) -> ArcPolyline {
        self.tessellate(&TessellationParams::with_max_error(max_error))
    }

    /// Lazily tessellates the arc with explicit parameters.
    #[must_use]
    pub fn tessellate(&self, params: &TessellationParams) -> ArcPolyline {
        let sweep = self.central_angle();
        ArcPolyline::new(
            self.start,
            self.end,
            self.center,
            self.radius,
            self.start_angle(),
            sweep,
            params.segment_count(self.radius, sweep.abs()),
        )
    }

    /// Rotates the arc counter-clockwise by `angle` radians around `about`.
    pub fn rotate(&mut self, angle: f64, about: &Point) {
        let c = to_point2(about);
        let turn = |p: &Point| round_point(&rotate_point(&to_point2(p), &c, angle));
        self.start = turn(&self.start);
        self.mid = turn(&self.mid);
        self.end = turn(&self.end);
        self.center = rotate_point(&self.center, &c, angle);
    }

    /// Translates the arc by `offset`.
    pub fn move_by(&mut self, offset: &Vector) {
        self.start = translate(&self.start, offset);
        self.mid = translate(&self.mid, offset);
        self.end = translate(&self.end, offset);
        self.center += Vector2::new(f64::from(offset.x), f64::from(offset.y));
    }

    /// Mirrors the arc across the vertical line `x = reference.x` (`mirror_x`)
    /// and/or the horizontal line `y = reference.y` (`mirror_y`).
    pub fn mirror(&mut self, mirror_x: bool, mirror_y: bool, reference: &Point) {
        let flip = |p: &mut Point| {
            if mirror_x {
                p.x = mirror_coord(p.x, reference.x);
            }
            if mirror_y {
                p.y = mirror_coord(p.y, reference.y);
            }
        };
        flip(&mut self.start);
        flip(&mut self.mid);
        flip(&mut self.end);
        if mirror_x {
            self.center.x = 2.0 * f64::from(reference.x) - self.center.x;
        }
        if mirror_y {
            self.center.y = 2.0 * f64::from(reference.y) - self.center.y;
        }
        if mirror_x != mirror_y {
            self.ccw = !self.ccw;
        }
    }

    /// Mirrors the arc across the line through `axis`.
    pub fn mirror_across(&mut self, axis: &Segment) {
        self.start = axis.reflect_point(&self.start);
        self.mid = axis.reflect_point(&self.mid);
        self.end = axis.reflect_point(&self.end);

        let a = to_point2(&axis.a);
        let d = to_point2(&axis.b) - a;
        let len_sq = d.norm_squared();
        if len_sq > TOLERANCE {
            let t = (self.center - a).dot(&d) / len_sq;
            let foot = a + d * t;
            self.center = Point2::from(foot.coords * 2.0 - self.center.coords);
        }
        self.ccw = !self.ccw;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::ChainError;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn upper_half() -> Arc {
        // CW from (-1000, 0) over the top to (1000, 0).
        Arc::from_three_points(pt(-1000, 0), pt(0, 1000), pt(1000, 0), 0).unwrap()
    }

    #[test]
    fn three_point_center_and_radius() {
        let arc = upper_half();
        assert_abs_diff_eq!(arc.center().x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center().y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.radius(), 1000.0, epsilon = 1e-9);
        assert!(arc.is_clockwise());
        assert_abs_diff_eq!(arc.central_angle(), -PI, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.length(), 1000.0 * PI, epsilon = 1e-6);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let err = Arc::from_three_points(pt(0, 0), pt(5, 5), pt(10, 10), 0).unwrap_err();
        assert!(matches!(err, ChainError::Geometry(GeometryError::Degenerate(_))));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        assert!(Arc::from_three_points(pt(3, 3), pt(3, 3), pt(3, 3), 0).is_err());
        assert!(Arc::from_center(pt(3, 3), pt(3, 3), PI, 0).is_err());
        assert!(Arc::from_center(pt(0, 0), pt(10, 0), 0.0, 0).is_err());
    }

    #[test]
    fn full_circle_from_three_points() {
        let arc = Arc::from_three_points(pt(100, 0), pt(-100, 0), pt(100, 0), 0).unwrap();
        assert!(arc.is_circle());
        assert_abs_diff_eq!(arc.radius(), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.central_angle(), TAU, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.reversed().central_angle(), -TAU, epsilon = 1e-9);
    }

    #[test]
    fn from_center_quarter_ccw() {
        let arc = Arc::from_center(pt(0, 0), pt(1000, 0), PI / 2.0, 10).unwrap();
        assert_eq!(arc.start(), pt(1000, 0));
        assert_eq!(arc.end(), pt(0, 1000));
        assert_eq!(arc.mid(), pt(707, 707));
        assert!(!arc.is_clockwise());
        assert_eq!(arc.width(), 10);
        assert_abs_diff_eq!(arc.central_angle(), PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_twice_is_identity() {
        let arc = Arc::from_center(pt(0, 0), pt(1000, 0), 1.2, 0).unwrap();
        let rev = arc.reversed();
        assert_eq!(rev.start(), arc.end());
        assert_eq!(rev.end(), arc.start());
        assert_abs_diff_eq!(rev.central_angle(), -arc.central_angle(), epsilon = 1e-9);
        assert_eq!(rev.reversed(), arc);

        let mut in_place = arc.clone();
        in_place.reverse();
        assert_eq!(in_place, rev);
    }

    #[test]
    fn collide_respects_angular_span() {
        let arc = upper_half();
        assert!(arc.collide(&pt(0, 1003), 5));
        assert!(!arc.collide(&pt(0, 1010), 5));
        // On the circle but outside the upper half.
        assert!(!arc.collide(&pt(0, -1000), 5));
        // Near an endpoint.
        assert!(arc.collide(&pt(1002, -2), 5));
    }

    #[test]
    fn polyline_endpoints_exact_and_within_error() {
        let arc = upper_half();
        let pts: Vec<Point> = arc.convert_to_polyline(5.0).collect();
        assert!(pts.len() > 3);
        assert_eq!(pts[0], arc.start());
        assert_eq!(*pts.last().unwrap(), arc.end());
        for p in &pts {
            let r = (to_point2(p) - arc.center()).norm();
            assert!((r - 1000.0).abs() <= 1.0, "r={r}");
            assert!(p.y >= 0);
        }
    }

    #[test]
    fn bbox_includes_extremes() {
        let arc = upper_half();
        let bbox = arc.bbox();
        assert_eq!(bbox.min, pt(-1000, 0));
        assert_eq!(bbox.max, pt(1000, 1000));
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut arc = upper_half();
        arc.rotate(PI / 2.0, &pt(0, 0));
        assert_eq!(arc.start(), pt(0, -1000));
        assert_eq!(arc.end(), pt(0, 1000));
        assert_eq!(arc.mid(), pt(-1000, 0));
        assert!(arc.is_clockwise());
    }

    #[test]
    fn mirror_flips_direction() {
        let mut arc = upper_half();
        arc.mirror(false, true, &pt(0, 0));
        assert_eq!(arc.mid(), pt(0, -1000));
        assert!(!arc.is_clockwise());
        assert_abs_diff_eq!(arc.central_angle(), PI, epsilon = 1e-9);
    }

    #[test]
    fn mirror_far_from_arc_saturates() {
        let mut arc = upper_half();
        arc.mirror(true, false, &pt(i32::MAX, 0));
        assert_eq!(arc.start(), pt(i32::MAX, 0));
        assert_eq!(arc.mid(), pt(i32::MAX, 1000));
    }

    #[test]
    fn mirror_across_axis() {
        let mut arc = upper_half();
        arc.mirror_across(&Segment::new(pt(0, 0), pt(10, 0)));
        assert_eq!(arc.mid(), pt(0, -1000));
        assert!(!arc.is_clockwise());
        assert_abs_diff_eq!(arc.center().y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn nearest_point_on_circle_snaps() {
        let arc = upper_half();
        assert_eq!(arc.nearest_point_on_circle(&pt(0, 1200)), pt(0, 1000));
    }

    #[test]
    fn angular_span_and_grid_center() {
        let arc = upper_half();
        assert!(arc.covers_angle(PI / 2.0));
        assert!(!arc.covers_angle(-PI / 2.0));
        assert_eq!(arc.center_point(), pt(0, 0));
    }
}
