use super::arc_2d::angle_in_arc_range;
use super::Point2;

/// Returns the minimum distance from point `p` to a circular arc.
///
/// The arc is defined by `center`, `radius`, `start_angle`, and `sweep`.
///
/// If the point's angle (relative to center) falls within the arc range,
/// the distance is `||p - center| - radius|`.
/// Otherwise, the distance is the minimum of the distances to the two arc endpoints.
#[must_use]
pub fn point_to_arc_dist(
    p: &Point2,
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> f64 {
    let d = p - center;
    let dist_to_center = d.norm();

    let angle = d.y.atan2(d.x);
    if angle_in_arc_range(angle, start_angle, sweep) {
        return (dist_to_center - radius).abs();
    }

    let end_angle = start_angle + sweep;
    let ep0 = Point2::new(
        center.x + radius * start_angle.cos(),
        center.y + radius * start_angle.sin(),
    );
    let ep1 = Point2::new(
        center.x + radius * end_angle.cos(),
        center.y + radius * end_angle.sin(),
    );

    (p - ep0).norm().min((p - ep1).norm())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn arc_dist_in_range() {
        // Angle of point = π/2, inside [0, π]. Distance = |2 - 1| = 1.
        let d = point_to_arc_dist(&Point2::new(0.0, 2.0), &Point2::origin(), 1.0, 0.0, PI);
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_outside_range() {
        // Angle = -π/2, not in [0, π]; nearest are the endpoints (±1, 0).
        let d = point_to_arc_dist(&Point2::new(0.0, -2.0), &Point2::origin(), 1.0, 0.0, PI);
        let expected = 5.0_f64.sqrt();
        assert!((d - expected).abs() < 1e-6, "d={d}");
    }

    #[test]
    fn arc_dist_on_arc() {
        let d = point_to_arc_dist(&Point2::new(0.0, 1.0), &Point2::origin(), 1.0, 0.0, PI);
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_clockwise_sweep() {
        // CW quarter from angle 0 to -π/2 covers the fourth quadrant.
        let d = point_to_arc_dist(
            &Point2::new(0.0, -3.0),
            &Point2::origin(),
            1.0,
            0.0,
            -PI / 2.0,
        );
        assert!((d - 2.0).abs() < TOL, "d={d}");
    }
}
