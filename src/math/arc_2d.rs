/// 2D circular arc math utilities.
///
/// Angles are in radians, measured counter-clockwise from the +X axis.
/// A positive sweep runs counter-clockwise.
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, TOLERANCE};

/// Computes the center of the circle through three points.
///
/// Returns `None` if the points are collinear or two of them coincide.
#[must_use]
pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
    let scale = ab.norm_squared().max(ac.norm_squared());
    if scale < TOLERANCE || d.abs() < TOLERANCE * scale {
        return None;
    }
    let ab_sq = ab.norm_squared();
    let ac_sq = ac.norm_squared();
    let ux = (ac.y * ab_sq - ab.y * ac_sq) / d;
    let uy = (ab.x * ac_sq - ac.x * ab_sq) / d;
    Some(Point2::new(a.x + ux, a.y + uy))
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Angle of `p` as seen from `center`.
#[must_use]
pub fn angle_of(center: &Point2, p: &Point2) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Rotates `p` around `about` by `angle` (counter-clockwise).
#[must_use]
pub fn rotate_point(p: &Point2, about: &Point2, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    let v = p - about;
    about + Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Projects `p` onto the circle of the given center and radius.
///
/// A point at the center projects onto the circle's +X extreme.
#[must_use]
pub fn nearest_point_on_circle(center: &Point2, radius: f64, p: &Point2) -> Point2 {
    let v = p - center;
    let len = v.norm();
    if len < TOLERANCE {
        return Point2::new(center.x + radius, center.y);
    }
    center + v * (radius / len)
}

/// Checks if an angle falls within an arc's angular range.
#[must_use]
pub fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    let eps = 1e-10;
    if sweep.abs() >= TAU - eps {
        return true;
    }
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += TAU;
        }
        while delta > TAU + eps {
            delta -= TAU;
        }
        delta >= -eps && delta <= sweep + eps
    } else {
        while delta > eps {
            delta -= TAU;
        }
        while delta < -TAU - eps {
            delta += TAU;
        }
        delta <= eps && delta >= sweep - eps
    }
}

/// Signed sweep from `start_angle` to `end_angle` in the given direction.
///
/// Equal angles produce a full turn.
#[must_use]
pub fn sweep_between(start_angle: f64, end_angle: f64, ccw: bool) -> f64 {
    let raw = if ccw {
        end_angle - start_angle
    } else {
        start_angle - end_angle
    };
    let mut sweep = normalize_angle(raw);
    if sweep < TOLERANCE {
        sweep = TAU;
    }
    if ccw {
        sweep
    } else {
        -sweep
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < TOLERANCE || abs_sweep < TOLERANCE || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil().min(f64::from(u32::MAX)) as u32;
    n.max(1)
}
