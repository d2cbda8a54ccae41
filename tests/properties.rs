#![allow(clippy::unwrap_used)]

use linechain::{Arc, LineChain, Point, TessellationParams};
use proptest::prelude::*;

fn points(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-100_000..100_000i32, -100_000..100_000i32), 0..max_len)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect())
}

/// Monotone staircase: alternating right and up steps, never touching itself.
fn staircase() -> impl Strategy<Value = LineChain> {
    prop::collection::vec(5..1_000i32, 2..12).prop_map(|steps| {
        let mut p = Point::new(0, 0);
        let mut chain = LineChain::from_points(&[p], false);
        for (i, step) in steps.into_iter().enumerate() {
            if i % 2 == 0 {
                p.x += step;
            } else {
                p.y += step;
            }
            chain.append_point(p);
        }
        chain
    })
}

/// Random plain points, optionally followed by an arc and a plain tail.
fn chain_with_optional_arc(max_len: usize) -> impl Strategy<Value = LineChain> {
    (points(max_len), any::<bool>(), any::<bool>(), 100.0..5_000.0f64).prop_map(
        |(pts, with_arc, closed, max_error)| {
            let mut chain = LineChain::from_points(&pts, closed);
            if with_arc {
                let arc = Arc::from_three_points(
                    Point::new(200_000, 0),
                    Point::new(300_000, 100_000),
                    Point::new(400_000, 0),
                    0,
                )
                .unwrap();
                chain.append_arc_with(&arc, &TessellationParams::with_max_error(max_error));
                chain.append_point(Point::new(500_000, 0));
            }
            chain
        },
    )
}

/// Straight lead-in along the x axis, an upper semicircle, then a straight tail.
fn semicircle_with_leads() -> impl Strategy<Value = LineChain> {
    (1_000..100_000i32, 10..5_000i32, 10.0..1_000.0f64, any::<bool>()).prop_map(
        |(radius, lead, max_error, closed)| {
            let mut chain = LineChain::from_points(&[Point::new(-radius - lead, 0)], closed);
            let arc = Arc::from_three_points(
                Point::new(-radius, 0),
                Point::new(0, radius),
                Point::new(radius, 0),
                0,
            )
            .unwrap();
            chain.append_arc_with(&arc, &TessellationParams::with_max_error(max_error));
            chain.append_point(Point::new(radius + lead, 0));
            chain
        },
    )
}

proptest! {
    #[test]
    fn text_form_round_trips(pts in points(20), closed in any::<bool>()) {
        let chain = LineChain::from_points(&pts, closed);
        let parsed = LineChain::parse(&chain.format()).unwrap();
        prop_assert_eq!(parsed, chain);
    }

    #[test]
    fn reverse_twice_is_identity(chain in chain_with_optional_arc(10)) {
        let reversed = chain.reversed();
        reversed.check_invariants().unwrap();
        prop_assert_eq!(reversed.arc_count(), chain.arc_count());
        prop_assert!((reversed.length() - chain.length()).abs() < 1e-6);
        prop_assert_eq!(reversed.reversed(), chain);
    }

    #[test]
    fn simplify_reaches_fixed_point(
        chain in chain_with_optional_arc(30),
        collinear in any::<bool>(),
    ) {
        let mut chain = chain;
        let arcs = chain.arc_count();
        chain.simplify(collinear);
        chain.check_invariants().unwrap();
        prop_assert_eq!(chain.arc_count(), arcs);
        let once = chain.clone();
        chain.simplify(collinear);
        prop_assert_eq!(chain, once);
    }

    #[test]
    fn split_inside_segment_keeps_length(
        chain in staircase(),
        pick in any::<prop::sample::Index>(),
        along in any::<prop::sample::Index>(),
    ) {
        let mut chain = chain;
        let segment = pick.index(chain.segment_count());
        let seg = chain.segment(isize::try_from(segment).unwrap());

        // Axis-aligned, so the length is exact; stay two units away from both ends.
        let len = (seg.b.x - seg.a.x).abs() + (seg.b.y - seg.a.y).abs();
        let offset = 2 + i32::try_from(along.index(usize::try_from(len - 3).unwrap())).unwrap();
        let dir_x = (seg.b.x - seg.a.x).signum();
        let dir_y = (seg.b.y - seg.a.y).signum();
        let target = Point::new(seg.a.x + dir_x * offset, seg.a.y + dir_y * offset);

        let before_len = chain.length();
        let before_count = chain.point_count();
        prop_assert_eq!(chain.split(target), Some(segment + 1));
        prop_assert_eq!(chain.point_count(), before_count + 1);
        prop_assert!((chain.length() - before_len).abs() < 1e-6);
    }

    #[test]
    fn split_on_arc_chain_keeps_length(
        chain in semicircle_with_leads(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut chain = chain;
        let segment = pick.index(chain.segment_count());
        let seg = chain.segment(isize::try_from(segment).unwrap());
        let target = Point::new((seg.a.x + seg.b.x) / 2, (seg.a.y + seg.b.y) / 2);

        let on_arc = chain.is_arc_segment(segment);
        let before_len = chain.length();
        let before_count = chain.point_count();
        prop_assert_eq!(chain.split(target), Some(segment + 1));
        prop_assert_eq!(chain.point_count(), before_count + 1);
        prop_assert_eq!(chain.arc_count(), 1);
        prop_assert_eq!(chain.is_point_on_arc(segment + 1), on_arc);
        prop_assert!((chain.length() - before_len).abs() < 1e-6);
        chain.check_invariants().unwrap();
    }
}
