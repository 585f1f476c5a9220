use crate::Vec3;

/// Area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    0.5 * (b - a).cross(c - a).length()
}

/// Closest point to `p` on the (filled) triangle `(a, b, c)`.
///
/// Region-based walk over the vertex, edge and face Voronoi regions. Degenerate
/// triangles (collinear or coincident corners) fall back to the nearest corner.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let q = closest_point_regions(p, a, b, c);
    if q.x.is_finite() && q.y.is_finite() && q.z.is_finite() {
        return q;
    }
    let mut best = a;
    for v in [b, c] {
        if (v - p).length_squared() < (best - p).length_squared() {
            best = v;
        }
    }
    best
}

fn closest_point_regions(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Separating-axis overlap test between a triangle and an axis-aligned box
/// given by its `center` and `half` extents. Touching counts as overlap.
pub fn triangle_box_overlap(center: Vec3, half: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    let v = [a - center, b - center, c - center];

    // Box face normals.
    for axis in 0..3 {
        let comp = |p: Vec3| p.to_array()[axis];
        let h = half.to_array()[axis];
        let lo = comp(v[0]).min(comp(v[1])).min(comp(v[2]));
        let hi = comp(v[0]).max(comp(v[1])).max(comp(v[2]));
        if lo > h || hi < -h {
            return false;
        }
    }

    // Triangle plane.
    let e = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
    let n = e[0].cross(e[1]);
    let r = half.x * n.x.abs() + half.y * n.y.abs() + half.z * n.z.abs();
    if n.dot(v[0]).abs() > r {
        return false;
    }

    // Cross products of box axes with triangle edges.
    for edge in e {
        let axes = [
            Vec3::new(0.0, -edge.z, edge.y),
            Vec3::new(edge.z, 0.0, -edge.x),
            Vec3::new(-edge.y, edge.x, 0.0),
        ];
        for axis in axes {
            let p0 = axis.dot(v[0]);
            let p1 = axis.dot(v[1]);
            let p2 = axis.dot(v[2]);
            let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
            if p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        )
    }

    #[test]
    fn area_of_right_triangle() {
        let (a, b, c) = tri();
        assert!((triangle_area(a, b, c) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn closest_point_projects_onto_face() {
        let (a, b, c) = tri();
        let q = closest_point_on_triangle(Vec3::new(0.5, 0.5, 3.0), a, b, c);
        assert!((q - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn closest_point_clamps_to_vertex_and_edge() {
        let (a, b, c) = tri();
        let q = closest_point_on_triangle(Vec3::new(-1.0, -1.0, 0.0), a, b, c);
        assert_eq!(q, a);
        let q = closest_point_on_triangle(Vec3::new(1.0, -5.0, 1.0), a, b, c);
        assert!((q - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
        let q = closest_point_on_triangle(Vec3::new(3.0, 3.0, 0.0), a, b, c);
        assert!((q - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn closest_point_on_degenerate_triangle_is_finite() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let z = Vec3::ZERO;
        let q = closest_point_on_triangle(p, z, z, z);
        assert_eq!(q, z);
    }

    #[test]
    fn box_overlap_hits_and_misses() {
        let (a, b, c) = tri();
        let half = Vec3::splat(0.5);
        assert!(triangle_box_overlap(Vec3::new(0.5, 0.5, 0.0), half, a, b, c));
        assert!(triangle_box_overlap(Vec3::new(0.5, 0.5, 0.5), half, a, b, c));
        assert!(!triangle_box_overlap(Vec3::new(0.5, 0.5, 1.1), half, a, b, c));
        // Beyond the hypotenuse.
        assert!(!triangle_box_overlap(Vec3::new(2.0, 2.0, 0.0), half, a, b, c));
    }
}
