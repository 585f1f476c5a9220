use core::fmt;

use blockforge_voxel::{FaceMask, Rgba, VisibilityGrid, VoxelMesh};
use hashbrown::HashMap;

use crate::atlas::{Atlas, AtlasBlock};
use crate::types::{Block, BlockMesh};

/// Chosen when the atlas has no blocks at all.
pub const FALLBACK_BLOCK: &str = "minecraft:stone";

/// A voxel the mapper could not place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkippedVoxel {
    /// Coordinate lies outside the visibility grid.
    OutOfBounds { position: [i32; 3] },
}

impl fmt::Display for SkippedVoxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkippedVoxel::OutOfBounds { position: [x, y, z] } => {
                write!(f, "voxel ({x},{y},{z}) is outside the visibility grid")
            }
        }
    }
}

/// Colour of `block` as seen through the exposed faces in `mask`: the
/// truncating mean of the exposed faces that have data, else the block average.
pub fn contextual_colour(block: &AtlasBlock, mask: FaceMask) -> Rgba {
    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for face in mask.iter() {
        if let Some(fd) = block.face(face) {
            r += fd.colour.r as u32;
            g += fd.colour.g as u32;
            b += fd.colour.b as u32;
            n += 1;
        }
    }
    if n == 0 {
        return block.colour;
    }
    Rgba::rgb((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Nearest-colour block selection memoized on `(colour, mask)`.
pub struct BlockMapper<'a> {
    atlas: &'a Atlas,
    cache: HashMap<(Rgba, FaceMask), &'a str>,
}

impl<'a> BlockMapper<'a> {
    pub fn new(atlas: &'a Atlas) -> Self {
        Self {
            atlas,
            cache: HashMap::new(),
        }
    }

    /// Block name whose contextual colour is closest to `colour`. Equal
    /// distances keep the earliest block in atlas order.
    pub fn choose(&mut self, colour: Rgba, mask: FaceMask) -> &'a str {
        if let Some(&name) = self.cache.get(&(colour, mask)) {
            return name;
        }
        let mut best: Option<(u32, &'a str)> = None;
        for block in self.atlas.blocks() {
            let d = colour.distance_sq(contextual_colour(block, mask));
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, block.name.as_str()));
            }
        }
        let name = best.map_or(FALLBACK_BLOCK, |(_, n)| n);
        self.cache.insert((colour, mask), name);
        name
    }

    /// Places the voxel at `p`, looking its exposure up in `visibility`.
    pub fn map_voxel(
        &mut self,
        p: [i32; 3],
        colour: Rgba,
        visibility: &VisibilityGrid,
    ) -> Result<Block, SkippedVoxel> {
        let mask = visibility
            .get(p[0], p[1], p[2])
            .ok_or(SkippedVoxel::OutOfBounds { position: p })?;
        Ok(Block::new(p, self.choose(colour, mask), colour))
    }

    #[inline]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Maps every voxel, returning the placed blocks and the voxels that were skipped.
pub fn map_voxels_with_report(
    voxels: &VoxelMesh,
    visibility: &VisibilityGrid,
    atlas: &Atlas,
) -> (BlockMesh, Vec<SkippedVoxel>) {
    log::info!(
        "mapping {} voxels against {} atlas blocks",
        voxels.voxel_count(),
        atlas.len()
    );
    let mut mapper = BlockMapper::new(atlas);
    let mut out = BlockMesh::for_voxels(voxels);
    let mut skipped = Vec::new();
    for (p, colour) in voxels.iter() {
        match mapper.map_voxel(p, colour, visibility) {
            Ok(block) => out.add_block(block),
            Err(skip) => {
                log::warn!("{skip}; skipping");
                skipped.push(skip);
            }
        }
    }
    log::info!(
        "placed {} blocks ({} distinct, {} cache entries, {} skipped)",
        out.len(),
        out.palette().len(),
        mapper.cache_len(),
        skipped.len()
    );
    (out, skipped)
}

pub fn map_voxels_to_blocks(
    voxels: &VoxelMesh,
    visibility: &VisibilityGrid,
    atlas: &Atlas,
) -> BlockMesh {
    map_voxels_with_report(voxels, visibility, atlas).0
}
