//! JSON dumps of intermediate artifacts for the web viewer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use blockforge_blocks::BlockMesh;
use blockforge_voxel::VoxelMesh;
use serde::Serialize;

use crate::schem::{AIR, ExportError};

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, value)?;
    w.flush().map_err(|e| ExportError::io(path, e))?;
    Ok(())
}

/// `[x][y][z] -> [r, g, b]` relative to the voxel bounds.
pub fn write_voxel_preview(voxels: &VoxelMesh, path: impl AsRef<Path>) -> Result<(), ExportError> {
    write_json(&voxels.to_rgb_grid(), path.as_ref())
}

/// `[x][y][z] -> block name` over a grid of `dims`; unplaced cells are air.
pub fn write_block_names_preview(
    blocks: &BlockMesh,
    dims: (usize, usize, usize),
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let (sx, sy, sz) = dims;
    let mut grid = vec![vec![vec![AIR; sz]; sy]; sx];
    for b in blocks.blocks() {
        let [x, y, z] = b.grid_pos();
        if x < 0 || y < 0 || z < 0 {
            continue;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x < sx && y < sy && z < sz {
            grid[x][y][z] = b.name.as_str();
        }
    }
    write_json(&grid, path.as_ref())
}
