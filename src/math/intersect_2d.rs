use super::{delta, narrow, rescale, ECoord, Point};

/// 2D cross product of two widened vectors.
#[must_use]
pub fn cross(a: (ECoord, ECoord), b: (ECoord, ECoord)) -> ECoord {
    a.0 * b.1 - a.1 * b.0
}

/// 2D dot product of two widened vectors.
#[must_use]
pub fn dot(a: (ECoord, ECoord), b: (ECoord, ECoord)) -> ECoord {
    a.0 * b.0 + a.1 * b.1
}

/// Exact segment-segment intersection on the integer grid.
///
/// Segments are `a0 → a1` and `b0 → b1`. Parallel (including collinear)
/// segments never intersect here; callers handle overlap separately.
///
/// - `ignore_endpoints`: a hit that lies on an endpoint of both segments is dropped.
/// - `as_lines`: treat both segments as infinite lines.
///
/// The returned point is rounded to the nearest grid point.
#[must_use]
pub fn segment_segment_intersect(
    a0: &Point,
    a1: &Point,
    b0: &Point,
    b1: &Point,
    ignore_endpoints: bool,
    as_lines: bool,
) -> Option<Point> {
    let e = delta(a0, a1);
    let f = delta(b0, b1);
    let ac = delta(a0, b0);

    let d = cross(f, e);
    let p = cross(f, ac);
    let q = cross(e, ac);

    if d == 0 {
        return None;
    }

    if !as_lines {
        if d > 0 && (q < 0 || q > d || p < 0 || p > d) {
            return None;
        }
        if d < 0 && (q < d || p < d || p > 0 || q > 0) {
            return None;
        }
        if ignore_endpoints && (q == 0 || q == d) && (p == 0 || p == d) {
            return None;
        }
    }

    Some(Point::new(
        narrow(ECoord::from(b0.x) + rescale(q, f.0, d)),
        narrow(ECoord::from(b0.y) + rescale(q, f.1, d)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn crossing_diagonals() {
        let hit = segment_segment_intersect(&pt(0, 0), &pt(10, 10), &pt(10, 0), &pt(0, 10), false, false);
        assert_eq!(hit, Some(pt(5, 5)));
    }

    #[test]
    fn disjoint_segments() {
        let hit = segment_segment_intersect(&pt(0, 0), &pt(1, 0), &pt(0, 1), &pt(1, 1), false, false);
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_segments_are_ambiguous() {
        let hit = segment_segment_intersect(&pt(0, 0), &pt(10, 0), &pt(5, 0), &pt(20, 0), false, false);
        assert!(hit.is_none());
    }

    #[test]
    fn shared_endpoint_reported_unless_ignored() {
        let a0 = pt(0, 0);
        let a1 = pt(10, 0);
        let b1 = pt(10, 10);
        assert_eq!(segment_segment_intersect(&a0, &a1, &a1, &b1, false, false), Some(a1));
        assert!(segment_segment_intersect(&a0, &a1, &a1, &b1, true, false).is_none());
    }

    #[test]
    fn lines_extend_beyond_segments() {
        let hit = segment_segment_intersect(&pt(0, 0), &pt(1, 0), &pt(5, 5), &pt(5, 4), false, true);
        assert_eq!(hit, Some(pt(5, 0)));
    }

    #[test]
    fn t_junction_touch() {
        let hit = segment_segment_intersect(&pt(0, 0), &pt(10, 0), &pt(5, 0), &pt(5, 10), true, false);
        assert_eq!(hit, Some(pt(5, 0)));
    }
}
