use blockforge_voxelize::KdTree;
use proptest::prelude::*;

fn brute_nearest(points: &[[i32; 3]], q: [i32; 3]) -> usize {
    let d = |p: [i32; 3]| {
        (0..3)
            .map(|a| (p[a] as i64 - q[a] as i64).pow(2))
            .sum::<i64>()
    };
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        if d(*p) < d(points[best]) {
            best = i;
        }
    }
    best
}

fn coord() -> impl Strategy<Value = [i32; 3]> {
    prop::array::uniform3(-12i32..12)
}

proptest! {
    #[test]
    fn nearest_matches_linear_scan(
        points in prop::collection::vec(coord(), 1..80),
        queries in prop::collection::vec(coord(), 1..20),
    ) {
        let tree = KdTree::build(points.clone());
        prop_assert_eq!(tree.len(), points.len());
        for q in queries {
            prop_assert_eq!(tree.nearest(q), Some(brute_nearest(&points, q)));
        }
    }
}
