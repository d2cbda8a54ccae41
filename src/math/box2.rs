use super::{narrow, Coord, ECoord, Point};

/// An integer axis-aligned bounding box. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Box2 {
    /// Minimum corner of the bounding box.
    pub min: Point,
    /// Maximum corner of the bounding box.
    pub max: Point,
}

impl Box2 {
    /// Creates a zero-size box around a single point.
    #[must_use]
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Creates a box spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Builds the bounding box of a point sequence, or `None` if it is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_point(*first);
        for p in iter {
            bbox.merge_point(p);
        }
        Some(bbox)
    }

    /// Grows the box to include `p`.
    pub fn merge_point(&mut self, p: &Point) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// Grows the box to include `other`.
    pub fn merge(&mut self, other: &Box2) {
        self.merge_point(&other.min);
        self.merge_point(&other.max);
    }

    /// Returns a copy grown by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: Coord) -> Self {
        let grow = |v: Coord, d: ECoord| narrow(ECoord::from(v) + d);
        let d = ECoord::from(amount);
        Self {
            min: Point::new(grow(self.min.x, -d), grow(self.min.y, -d)),
            max: Point::new(grow(self.max.x, d), grow(self.max.y, d)),
        }
    }

    /// Returns `true` if the two boxes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Box2) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Returns `true` if `p` lies inside or on the border of the box.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> ECoord {
        ECoord::from(self.max.x) - ECoord::from(self.min.x)
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> ECoord {
        ECoord::from(self.max.y) - ECoord::from(self.min.y)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_normalised() {
        let b = Box2::from_corners(Point::new(10, -5), Point::new(-2, 7));
        assert_eq!(b.min, Point::new(-2, -5));
        assert_eq!(b.max, Point::new(10, 7));
        assert_eq!(b.width(), 12);
        assert_eq!(b.height(), 12);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Box2::from_points(&[]).is_none());
    }

    #[test]
    fn from_points_covers_all() {
        let pts = [Point::new(1, 1), Point::new(-3, 4), Point::new(2, -6)];
        let b = Box2::from_points(&pts).unwrap();
        assert_eq!(b.min, Point::new(-3, -6));
        assert_eq!(b.max, Point::new(2, 4));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Box2::from_corners(Point::new(0, 0), Point::new(10, 10));
        let b = Box2::from_corners(Point::new(10, 10), Point::new(20, 20));
        let c = Box2::from_corners(Point::new(11, 0), Point::new(20, 20));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn inflate_and_contains() {
        let b = Box2::from_point(Point::new(0, 0)).inflate(5);
        assert!(b.contains(&Point::new(5, -5)));
        assert!(!b.contains(&Point::new(6, 0)));
    }
}
