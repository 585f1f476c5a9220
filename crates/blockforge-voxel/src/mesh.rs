use blockforge_geom::{Aabb, Vec3};
use indexmap::IndexMap;

use crate::types::Rgba;

pub type VoxelCoord = [i32; 3];

/// Sparse coloured voxels keyed by integer coordinate.
///
/// Iteration follows first-insertion order; re-adding a coordinate replaces its
/// colour in place. Bounds grow with every insert and never shrink.
#[derive(Clone, Debug, Default)]
pub struct VoxelMesh {
    voxels: IndexMap<VoxelCoord, Rgba>,
    min: VoxelCoord,
    max: VoxelCoord,
}

impl VoxelMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_voxel(&mut self, x: i32, y: i32, z: i32, colour: Rgba) {
        let p = [x, y, z];
        if self.voxels.is_empty() {
            self.min = p;
            self.max = p;
        } else {
            for a in 0..3 {
                self.min[a] = self.min[a].min(p[a]);
                self.max[a] = self.max[a].max(p[a]);
            }
        }
        self.voxels.insert(p, colour);
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Rgba> {
        self.voxels.get(&[x, y, z]).copied()
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoxelCoord, Rgba)> + '_ {
        self.voxels.iter().map(|(k, v)| (*k, *v))
    }

    /// Integer min/max corners; `(0,0,0)-(0,0,0)` when empty.
    #[inline]
    pub fn int_bounds(&self) -> (VoxelCoord, VoxelCoord) {
        if self.voxels.is_empty() {
            ([0; 3], [0; 3])
        } else {
            (self.min, self.max)
        }
    }

    pub fn bounds(&self) -> Aabb {
        let (min, max) = self.int_bounds();
        Aabb::new(Vec3::from_ivec(min), Vec3::from_ivec(max))
    }

    /// Inclusive extent per axis (`max - min + 1`).
    pub fn dims(&self) -> (usize, usize, usize) {
        let (min, max) = self.int_bounds();
        (
            (max[0] - min[0] + 1) as usize,
            (max[1] - min[1] + 1) as usize,
            (max[2] - min[2] + 1) as usize,
        )
    }

    /// Dense `[x][y][z] -> rgb` grid relative to the min corner. Uncoloured
    /// cells are black; an empty mesh yields a single black cell.
    pub fn to_rgb_grid(&self) -> Vec<Vec<Vec<[u8; 3]>>> {
        let (dx, dy, dz) = self.dims();
        let mut grid = vec![vec![vec![[0u8; 3]; dz]; dy]; dx];
        let (min, _) = self.int_bounds();
        for (p, c) in self.iter() {
            let lx = (p[0] - min[0]) as usize;
            let ly = (p[1] - min[1]) as usize;
            let lz = (p[2] - min[2]) as usize;
            grid[lx][ly][lz] = c.to_rgb();
        }
        grid
    }
}
