use super::{delta, rescale, ECoord, Point};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += f64::from(points[i].x) * f64::from(points[j].y)
            - f64::from(points[j].x) * f64::from(points[i].y);
    }
    sum * 0.5
}

/// Even-odd containment test by casting a ray towards +X.
///
/// The polygon is implicitly closed. Points on a left or bottom edge tend to
/// count as inside and points on a right or top edge as outside; callers that
/// need a symmetric boundary rule must test the edges separately.
#[must_use]
pub fn ray_cast_inside(points: &[Point], p: &Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    for i in 0..n {
        let p1 = &points[i];
        let p2 = &points[if i + 1 == n { 0 } else { i + 1 }];
        let (dx, dy) = delta(p1, p2);

        if dy != 0 {
            let d = rescale(dx, ECoord::from(p.y) - ECoord::from(p1.y), dy);
            if ((p1.y > p.y) != (p2.y > p.y)) && (ECoord::from(p.x) - ECoord::from(p1.x) < d) {
                inside = !inside;
            }
        }
    }
    inside
}
