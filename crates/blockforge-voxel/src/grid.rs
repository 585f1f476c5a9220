use crate::face::FaceMask;

/// Dense 3D array over voxel coordinates `[0,sx) x [0,sy) x [0,sz)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid3<T> {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    cells: Vec<T>,
}

/// Occupancy at voxel resolution.
pub type SolidGrid = Grid3<bool>;

/// Exposure mask per voxel; only meaningful where the solid grid is set.
pub type VisibilityGrid = Grid3<FaceMask>;

impl<T: Copy> Grid3<T> {
    pub fn new(sx: usize, sy: usize, sz: usize, fill: T) -> Self {
        Self {
            sx,
            sy,
            sz,
            cells: vec![fill; sx * sy * sz],
        }
    }

    /// Wraps linear storage laid out as [`Grid3::idx`]; a wrong-sized buffer is
    /// padded or truncated with `fill`.
    pub fn from_cells(sx: usize, sy: usize, sz: usize, cells: Vec<T>, fill: T) -> Self {
        let mut cells = cells;
        cells.resize(sx * sy * sz, fill);
        Self { sx, sy, sz, cells }
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> T {
        self.cells[self.idx(x, y, z)]
    }

    /// Bounds-checked read; `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<T> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: T) {
        let i = self.idx(x, y, z);
        self.cells[i] = v;
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Coordinates of every cell matching `pred`, x-major then y then z.
    pub fn positions_where(&self, mut pred: impl FnMut(T) -> bool) -> Vec<[i32; 3]> {
        let mut out = Vec::new();
        for x in 0..self.sx {
            for y in 0..self.sy {
                for z in 0..self.sz {
                    if pred(self.get_local(x, y, z)) {
                        out.push([x as i32, y as i32, z as i32]);
                    }
                }
            }
        }
        out
    }

    /// Same-shape grid with `f` applied to each cell.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid3<U> {
        Grid3 {
            sx: self.sx,
            sy: self.sy,
            sz: self.sz,
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }
}

impl Grid3<bool> {
    #[inline]
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Solid test where anything outside the grid is empty.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).unwrap_or(false)
    }
}
