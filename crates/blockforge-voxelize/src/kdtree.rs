//! Static 3-d tree over integer voxel coordinates for nearest-neighbour lookups.

/// Balanced k-d tree stored implicitly: every subrange of `order` has its
/// splitting point at the middle index.
#[derive(Clone, Debug)]
pub struct KdTree {
    points: Vec<[i32; 3]>,
    order: Vec<usize>,
}

impl KdTree {
    pub fn build(points: Vec<[i32; 3]>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        build_range(&points, &mut order, 0);
        Self { points, order }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn point(&self, i: usize) -> [i32; 3] {
        self.points[i]
    }

    /// Index (into the original point list) of the euclidean-nearest point.
    /// Equal distances resolve to the lowest index.
    pub fn nearest(&self, q: [i32; 3]) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let mut best = (i64::MAX, usize::MAX);
        self.search(q, 0, self.order.len(), 0, &mut best);
        Some(best.1)
    }

    fn search(&self, q: [i32; 3], lo: usize, hi: usize, depth: usize, best: &mut (i64, usize)) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let idx = self.order[mid];
        let p = self.points[idx];
        let d = dist_sq(p, q);
        if (d, idx) < *best {
            *best = (d, idx);
        }
        let axis = depth % 3;
        let diff = q[axis] as i64 - p[axis] as i64;
        let (near, far) = if diff < 0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.search(q, near.0, near.1, depth + 1, best);
        if diff * diff <= best.0 {
            self.search(q, far.0, far.1, depth + 1, best);
        }
    }
}

fn build_range(points: &[[i32; 3]], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    let mid = order.len() / 2;
    order.select_nth_unstable_by_key(mid, |&i| (points[i][axis], i));
    let (left, rest) = order.split_at_mut(mid);
    build_range(points, left, depth + 1);
    build_range(points, &mut rest[1..], depth + 1);
}

#[inline]
fn dist_sq(a: [i32; 3], b: [i32; 3]) -> i64 {
    let dx = a[0] as i64 - b[0] as i64;
    let dy = a[1] as i64 - b[1] as i64;
    let dz = a[2] as i64 - b[2] as i64;
    dx * dx + dy * dy + dz * dz
}
