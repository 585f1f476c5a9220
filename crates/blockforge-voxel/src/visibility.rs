use crate::face::{Face, FaceMask};
use crate::grid::{SolidGrid, VisibilityGrid};

/// Per-voxel exposure: a face bit is set when the neighbour across it is not
/// solid. Cells beyond the grid edge count as empty. Non-solid cells get
/// [`FaceMask::EMPTY`].
pub fn compute_face_visibility(solid: &SolidGrid) -> VisibilityGrid {
    log::info!(
        "computing face visibility for {} solid voxels",
        solid.count_set()
    );
    let (sx, sy, sz) = solid.dims();
    let mut out = VisibilityGrid::new(sx, sy, sz, FaceMask::EMPTY);
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                if !solid.get_local(x, y, z) {
                    continue;
                }
                out.set(x, y, z, exposed_faces(solid, x as i32, y as i32, z as i32));
            }
        }
    }
    out
}

#[inline]
fn exposed_faces(solid: &SolidGrid, x: i32, y: i32, z: i32) -> FaceMask {
    let mut mask = FaceMask::EMPTY;
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        if !solid.is_solid(x + dx, y + dy, z + dz) {
            mask.insert(face);
        }
    }
    mask
}
