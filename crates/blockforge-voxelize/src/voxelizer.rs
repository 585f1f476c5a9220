use blockforge_geom::Vec3;
use blockforge_geom::triangle::{closest_point_on_triangle, triangle_area};
use blockforge_voxel::{Rgba, SolidGrid, VoxelMesh};
use rayon::prelude::*;

use crate::kdtree::KdTree;
use crate::mesh::TexturedMesh;
use crate::raster::{GridFrame, ShellRaster, fill_interior, rasterize_shell, surface_of};
use crate::texture::Texture;

/// Smallest usable voxel pitch and mesh extent.
pub const MIN_PITCH: f64 = 1e-6;

/// Sub-triangle area sum below which a sample point is treated as degenerate.
const MIN_SAMPLE_AREA: f64 = 1e-9;

/// Mesh-to-voxel strategy.
pub trait Voxelizer {
    /// Rasterizes `mesh` at a resolution of at most `max_blocks` voxels along its
    /// largest axis. Returns the coloured voxels and the dense occupancy grid,
    /// both in grid coordinates.
    fn voxelize(
        &self,
        mesh: &TexturedMesh,
        texture: &Texture,
        max_blocks: u32,
        fill: bool,
    ) -> (VoxelMesh, SolidGrid);

    /// [`Voxelizer::voxelize`] plus a summary log line.
    fn run(
        &self,
        mesh: &TexturedMesh,
        texture: &Texture,
        max_blocks: u32,
        fill: bool,
    ) -> (VoxelMesh, SolidGrid) {
        let (voxels, solid) = self.voxelize(mesh, texture, max_blocks, fill);
        let (dx, dy, dz) = voxels.dims();
        log::info!(
            "voxelized {} faces into {} voxels ({}x{}x{})",
            mesh.face_count(),
            voxels.voxel_count(),
            dx,
            dy,
            dz
        );
        (voxels, solid)
    }
}

/// Uniform-grid voxelizer: separating-axis shell rasterization, optional
/// flood-fill interior, texture lookup at the closest surface point.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicGridVoxelizer;

impl Voxelizer for BasicGridVoxelizer {
    fn voxelize(
        &self,
        mesh: &TexturedMesh,
        texture: &Texture,
        max_blocks: u32,
        fill: bool,
    ) -> (VoxelMesh, SolidGrid) {
        let mut voxels = VoxelMesh::new();
        let empty = || SolidGrid::new(1, 1, 1, false);

        let Some(bounds) = mesh.bounds() else {
            return (voxels, empty());
        };
        let extent = bounds.extent();
        let largest = extent.max_element();
        if largest < MIN_PITCH {
            return (voxels, empty());
        }
        let pitch = if max_blocks > 1 {
            largest / (max_blocks - 1) as f64
        } else {
            largest
        }
        .max(MIN_PITCH);

        let frame = GridFrame::new(bounds.min, extent, pitch);
        log::info!(
            "rasterizing at pitch {:.6} into {}x{}x{} cells",
            pitch,
            frame.dims.0,
            frame.dims.1,
            frame.dims.2
        );
        let raster = rasterize_shell(mesh, &frame);
        let solid = if fill {
            fill_interior(&raster.shell)
        } else {
            raster.shell.clone()
        };

        let mut surface = surface_of(&solid);
        let mut surface_pts = surface.positions_where(|s| s);
        if surface_pts.is_empty() && solid.count_set() > 0 {
            log::warn!("no surface voxels after erosion; colouring every solid voxel");
            surface = solid.clone();
            surface_pts = solid.positions_where(|s| s);
        }
        if surface_pts.is_empty() {
            log::error!("voxelization produced no solid voxels");
            return (voxels, solid);
        }
        log::info!("colouring {} surface voxels", surface_pts.len());

        let colours: Vec<Rgba> = surface_pts
            .par_iter()
            .map(|p| surface_colour(mesh, texture, &raster, &frame, *p))
            .collect();
        for (p, c) in surface_pts.iter().zip(&colours) {
            voxels.add_voxel(p[0], p[1], p[2], *c);
        }

        if fill {
            let interior: Vec<[i32; 3]> = solid
                .positions_where(|s| s)
                .into_iter()
                .filter(|p| !surface.is_solid(p[0], p[1], p[2]))
                .collect();
            if !interior.is_empty() {
                log::info!("filling {} interior voxels", interior.len());
                let tree = KdTree::build(surface_pts);
                for p in interior {
                    let Some(i) = tree.nearest(p) else { continue };
                    let src = tree.point(i);
                    if let Some(c) = voxels.get(src[0], src[1], src[2]) {
                        voxels.add_voxel(p[0], p[1], p[2], c);
                    }
                }
            }
        }

        (voxels, solid)
    }
}

/// Texture colour at the mesh point closest to the centre of voxel `p`.
fn surface_colour(
    mesh: &TexturedMesh,
    texture: &Texture,
    raster: &ShellRaster,
    frame: &GridFrame,
    p: [i32; 3],
) -> Rgba {
    let center = frame.center(p);
    let mut candidates = raster.candidates(p);
    if candidates.is_empty() {
        candidates = (0..mesh.face_count() as u32).collect();
    }

    let mut best: Option<(f64, usize, Vec3)> = None;
    for f in candidates {
        let f = f as usize;
        let Some([a, b, c]) = mesh.triangle(f) else {
            continue;
        };
        let q = closest_point_on_triangle(center, a, b, c);
        let d = (q - center).length_squared();
        if best.is_none_or(|(bd, _, _)| d < bd) {
            best = Some((d, f, q));
        }
    }
    match best {
        Some((_, f, q)) => sample_face(mesh, texture, f, q),
        None => Rgba::MAGENTA,
    }
}

/// Interpolates the UVs of face `f` at `q` using sub-triangle area weights.
fn sample_face(mesh: &TexturedMesh, texture: &Texture, f: usize, q: Vec3) -> Rgba {
    let Some([v0, v1, v2]) = mesh.triangle(f) else {
        return Rgba::MAGENTA;
    };
    let [uv0, uv1, uv2] = mesh.triangle_uvs(f);

    let area01 = triangle_area(v0, v1, q);
    let area12 = triangle_area(v1, v2, q);
    let area20 = triangle_area(v2, v0, q);
    let total = area01 + area12 + area20;
    if total < MIN_SAMPLE_AREA {
        return Rgba::MAGENTA;
    }
    let w0 = area12 / total;
    let w1 = area20 / total;
    let w2 = area01 / total;

    let u = uv0[0] * w0 + uv1[0] * w1 + uv2[0] * w2;
    let v = uv0[1] * w0 + uv1[1] * w1 + uv2[1] * w2;
    if u.is_nan() || v.is_nan() {
        return Rgba::MAGENTA;
    }
    texture.sample_uv(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh(uv: [f64; 2]) -> TexturedMesh {
        TexturedMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![uv; 4],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn corner_weights_pick_corner_uv() {
        let mut mesh = quad_mesh([0.0, 0.0]);
        mesh.uvs = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        let tex = Texture::from_raw(2, 2, 3, vec![10, 0, 0, 20, 0, 0, 30, 0, 0, 40, 0, 0])
            .unwrap();
        // At vertex 0 the uv is (0,1): top-left pixel.
        assert_eq!(sample_face(&mesh, &tex, 0, mesh.positions[0]), Rgba::rgb(10, 0, 0));
        // At vertex 2 the uv is (1,0): bottom-right pixel (clamped).
        assert_eq!(sample_face(&mesh, &tex, 0, mesh.positions[2]), Rgba::rgb(40, 0, 0));
    }

    #[test]
    fn degenerate_face_samples_magenta() {
        let mesh = TexturedMesh::new(vec![Vec3::ZERO; 3], vec![[0.5, 0.5]; 3], vec![[0, 1, 2]]);
        let tex = Texture::from_raw(1, 1, 3, vec![1, 2, 3]).unwrap();
        assert_eq!(sample_face(&mesh, &tex, 0, Vec3::ZERO), Rgba::MAGENTA);
    }

    #[test]
    fn missing_uvs_sample_magenta() {
        let mut mesh = quad_mesh([0.5, 0.5]);
        mesh.uvs.clear();
        let tex = Texture::from_raw(1, 1, 3, vec![1, 2, 3]).unwrap();
        assert_eq!(
            sample_face(&mesh, &tex, 0, Vec3::new(0.7, 0.2, 0.0)),
            Rgba::MAGENTA
        );
    }
}
