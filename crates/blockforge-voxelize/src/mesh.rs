use blockforge_geom::{Aabb, Vec3};

/// Triangle mesh with optional per-vertex texture coordinates.
#[derive(Clone, Debug, Default)]
pub struct TexturedMesh {
    pub positions: Vec<Vec3>,
    /// Per-vertex UV; may be shorter than `positions` (missing entries sample as NaN).
    pub uvs: Vec<[f64; 2]>,
    pub faces: Vec<[u32; 3]>,
}

impl TexturedMesh {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<[f64; 2]>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            uvs,
            faces,
        }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Corner positions of face `f`; `None` if an index is out of range.
    pub fn triangle(&self, f: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.faces.get(f)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    pub fn triangle_uvs(&self, f: usize) -> [[f64; 2]; 3] {
        const MISSING: [f64; 2] = [f64::NAN, f64::NAN];
        match self.faces.get(f) {
            Some(face) => face.map(|i| self.uvs.get(i as usize).copied().unwrap_or(MISSING)),
            None => [MISSING; 3],
        }
    }
}
