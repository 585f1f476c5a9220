use blockforge_geom::Vec3;
use blockforge_geom::triangle::{closest_point_on_triangle, triangle_area, triangle_box_overlap};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -100.0f64..100.0
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // The closest point is never farther than any corner
    #[test]
    fn closest_point_beats_corners(p in arb_vec3(), a in arb_vec3(), b in arb_vec3(), c in arb_vec3()) {
        let q = closest_point_on_triangle(p, a, b, c);
        let d = (q - p).length();
        for v in [a, b, c] {
            prop_assert!(d <= (v - p).length() + 1e-9);
        }
    }

    // On a non-degenerate triangle the sub-areas of the closest point add up to the whole
    #[test]
    fn closest_point_lies_in_triangle(p in arb_vec3(), a in arb_vec3(), b in arb_vec3(), c in arb_vec3()) {
        let total = triangle_area(a, b, c);
        prop_assume!(total > 1e-3);
        let q = closest_point_on_triangle(p, a, b, c);
        let sum = triangle_area(a, b, q) + triangle_area(b, c, q) + triangle_area(c, a, q);
        prop_assert!((sum - total).abs() <= 1e-6 * total.max(1.0));
    }

    // A box centred on a point of the triangle always overlaps it
    #[test]
    fn box_around_surface_point_overlaps(p in arb_vec3(), a in arb_vec3(), b in arb_vec3(), c in arb_vec3(), h in 0.01f64..5.0) {
        let q = closest_point_on_triangle(p, a, b, c);
        prop_assert!(triangle_box_overlap(q, Vec3::splat(h), a, b, c));
    }

    // A box farther than its half-diagonal from the triangle never overlaps
    #[test]
    fn distant_box_misses(p in arb_vec3(), a in arb_vec3(), b in arb_vec3(), c in arb_vec3(), h in 0.01f64..5.0) {
        let q = closest_point_on_triangle(p, a, b, c);
        prop_assume!((q - p).length() > h * 3f64.sqrt() + 1e-6);
        prop_assert!(!triangle_box_overlap(p, Vec3::splat(h), a, b, c));
    }
}
