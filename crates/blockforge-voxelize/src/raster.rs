use std::collections::VecDeque;

use blockforge_geom::Vec3;
use blockforge_geom::triangle::triangle_box_overlap;
use blockforge_voxel::{Face, SolidGrid};
use hashbrown::HashMap;

use crate::mesh::TexturedMesh;

/// Placement of the voxel lattice in mesh space: cell `(i,j,k)` is centred at
/// `origin + (i,j,k) * pitch`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GridFrame {
    pub origin: Vec3,
    pub pitch: f64,
    pub dims: (usize, usize, usize),
}

impl GridFrame {
    pub fn new(origin: Vec3, extent: Vec3, pitch: f64) -> Self {
        let cells = |e: f64| (e / pitch).round().max(0.0) as usize + 1;
        Self {
            origin,
            pitch,
            dims: (cells(extent.x), cells(extent.y), cells(extent.z)),
        }
    }

    #[inline]
    pub fn center(&self, p: [i32; 3]) -> Vec3 {
        self.origin + Vec3::from_ivec(p) * self.pitch
    }

    /// Cell index range (inclusive) covering `[lo, hi]` along one axis, clamped.
    fn cell_span(&self, lo: f64, hi: f64, origin: f64, n: usize) -> (usize, usize) {
        let max = n as i64 - 1;
        let a = ((lo - origin) / self.pitch + 0.5).floor() as i64;
        let b = ((hi - origin) / self.pitch + 0.5).floor() as i64;
        (a.clamp(0, max) as usize, b.clamp(0, max) as usize)
    }
}

/// Shell occupancy plus, for every shell cell, the triangles touching it.
pub(crate) struct ShellRaster {
    pub shell: SolidGrid,
    pub cell_tris: HashMap<usize, Vec<u32>>,
}

impl ShellRaster {
    /// Triangles recorded in the 3x3x3 neighbourhood of `p`.
    pub fn candidates(&self, p: [i32; 3]) -> Vec<u32> {
        let mut out = Vec::new();
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    let (x, y, z) = (p[0] + dx, p[1] + dy, p[2] + dz);
                    if !self.shell.contains(x, y, z) {
                        continue;
                    }
                    let i = self.shell.idx(x as usize, y as usize, z as usize);
                    if let Some(tris) = self.cell_tris.get(&i) {
                        out.extend_from_slice(tris);
                    }
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

pub(crate) fn rasterize_shell(mesh: &TexturedMesh, frame: &GridFrame) -> ShellRaster {
    let (sx, sy, sz) = frame.dims;
    let mut shell = SolidGrid::new(sx, sy, sz, false);
    let mut cell_tris: HashMap<usize, Vec<u32>> = HashMap::new();
    // Slightly inflated so triangles lying exactly on a cell face mark both sides.
    let half = Vec3::splat(frame.pitch * 0.5 * (1.0 + 1e-9));

    for f in 0..mesh.face_count() {
        let Some([a, b, c]) = mesh.triangle(f) else {
            log::warn!("face {} references a missing vertex; skipping", f);
            continue;
        };
        let lo = a.min(b).min(c);
        let hi = a.max(b).max(c);
        let (x0, x1) = frame.cell_span(lo.x, hi.x, frame.origin.x, sx);
        let (y0, y1) = frame.cell_span(lo.y, hi.y, frame.origin.y, sy);
        let (z0, z1) = frame.cell_span(lo.z, hi.z, frame.origin.z, sz);
        for y in y0..=y1 {
            for z in z0..=z1 {
                for x in x0..=x1 {
                    let center = frame.center([x as i32, y as i32, z as i32]);
                    if !triangle_box_overlap(center, half, a, b, c) {
                        continue;
                    }
                    shell.set(x, y, z, true);
                    cell_tris
                        .entry(shell.idx(x, y, z))
                        .or_default()
                        .push(f as u32);
                }
            }
        }
    }
    ShellRaster { shell, cell_tris }
}

/// Shell plus every cell not reachable from the grid border through empty
/// cells (6-connected flood fill of the exterior).
pub(crate) fn fill_interior(shell: &SolidGrid) -> SolidGrid {
    let (sx, sy, sz) = shell.dims();
    let mut exterior = SolidGrid::new(sx, sy, sz, false);
    let mut queue: VecDeque<(usize, usize, usize)> = VecDeque::new();

    let mut seed = |x: usize, y: usize, z: usize, exterior: &mut SolidGrid| {
        if !shell.get_local(x, y, z) && !exterior.get_local(x, y, z) {
            exterior.set(x, y, z, true);
            queue.push_back((x, y, z));
        }
    };
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let border = x == 0
                    || y == 0
                    || z == 0
                    || x + 1 == sx
                    || y + 1 == sy
                    || z + 1 == sz;
                if border {
                    seed(x, y, z, &mut exterior);
                }
            }
        }
    }

    while let Some((x, y, z)) = queue.pop_front() {
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
            if !shell.contains(nx, ny, nz) {
                continue;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if shell.get_local(nx, ny, nz) || exterior.get_local(nx, ny, nz) {
                continue;
            }
            exterior.set(nx, ny, nz, true);
            queue.push_back((nx, ny, nz));
        }
    }

    exterior.map(|outside| !outside)
}

/// Solid cells with at least one 6-neighbour that is empty or off-grid
/// (`solid AND NOT erode(solid)`).
pub(crate) fn surface_of(solid: &SolidGrid) -> SolidGrid {
    let (sx, sy, sz) = solid.dims();
    let mut surface = SolidGrid::new(sx, sy, sz, false);
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                if !solid.get_local(x, y, z) {
                    continue;
                }
                let (xi, yi, zi) = (x as i32, y as i32, z as i32);
                let exposed = Face::ALL.iter().any(|f| {
                    let (dx, dy, dz) = f.delta();
                    !solid.is_solid(xi + dx, yi + dy, zi + dz)
                });
                if exposed {
                    surface.set(x, y, z, true);
                }
            }
        }
    }
    surface
}
