pub mod arc_2d;
pub mod box2;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

pub use box2::Box2;

/// Integer coordinate type (typically nanometres).
pub type Coord = i32;

/// Extended coordinate type for deltas and for products of two deltas.
///
/// A delta between two [`Coord`] values needs 33 bits, so squared lengths and
/// cross products need 67.
pub type ECoord = i128;

/// 2D integer point type.
pub type Point = nalgebra::Point2<Coord>;

/// 2D integer vector type.
pub type Vector = nalgebra::Vector2<Coord>;

/// 2D floating-point point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D floating-point vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Points closer than this to an existing vertex are not split off as a new vertex.
pub const SPLIT_SNAP_DISTANCE: Coord = 2;

/// Perpendicular distance under which three points are treated as collinear.
pub const COLLINEAR_TOLERANCE: Coord = 1;

/// Rounds a floating-point value to the nearest coordinate, half away from zero.
///
/// Values outside the coordinate range saturate.
#[must_use]
pub fn round_coord(value: f64) -> Coord {
    if value.is_nan() {
        return 0;
    }
    let clamped = value
        .round()
        .clamp(f64::from(Coord::MIN), f64::from(Coord::MAX));
    #[allow(clippy::cast_possible_truncation)]
    let rounded = clamped as Coord;
    rounded
}

/// Converts an integer point to floating point.
#[must_use]
pub fn to_point2(p: &Point) -> Point2 {
    Point2::new(f64::from(p.x), f64::from(p.y))
}

/// Rounds a floating-point point onto the integer grid.
#[must_use]
pub fn round_point(p: &Point2) -> Point {
    Point::new(round_coord(p.x), round_coord(p.y))
}

/// Difference `b - a` widened to [`ECoord`] components.
#[must_use]
pub fn delta(a: &Point, b: &Point) -> (ECoord, ECoord) {
    (
        ECoord::from(b.x) - ECoord::from(a.x),
        ECoord::from(b.y) - ECoord::from(a.y),
    )
}

/// Squared Euclidean distance between two integer points.
#[must_use]
pub fn squared_distance(a: &Point, b: &Point) -> ECoord {
    let (dx, dy) = delta(a, b);
    dx * dx + dy * dy
}

/// Euclidean distance between two integer points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (squared_distance(a, b) as f64).sqrt()
}

/// Computes `numerator * value / denominator` rounded half away from zero.
///
/// Returns `0` for a zero denominator; the product saturates.
#[must_use]
pub fn rescale(numerator: ECoord, value: ECoord, denominator: ECoord) -> ECoord {
    if denominator == 0 {
        return 0;
    }
    let num = numerator.saturating_mul(value);
    let magnitude = num.unsigned_abs().saturating_add(denominator.unsigned_abs() / 2)
        / denominator.unsigned_abs();
    let magnitude = ECoord::try_from(magnitude).unwrap_or(ECoord::MAX);
    if (num < 0) == (denominator < 0) {
        magnitude
    } else {
        -magnitude
    }
}

/// Saturating conversion from [`ECoord`] to [`Coord`].
#[must_use]
pub fn narrow(value: ECoord) -> Coord {
    Coord::try_from(value).unwrap_or(if value < 0 { Coord::MIN } else { Coord::MAX })
}

/// `p + v`, saturating at the coordinate range.
#[must_use]
pub fn translate(p: &Point, v: &Vector) -> Point {
    Point::new(
        narrow(ECoord::from(p.x) + ECoord::from(v.x)),
        narrow(ECoord::from(p.y) + ECoord::from(v.y)),
    )
}

/// Reflection of `value` about `reference` on one axis, saturating.
#[must_use]
pub fn mirror_coord(value: Coord, reference: Coord) -> Coord {
    narrow(2 * ECoord::from(reference) - ECoord::from(value))
}
