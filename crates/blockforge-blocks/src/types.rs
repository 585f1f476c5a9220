use std::collections::BTreeSet;

use blockforge_geom::{Aabb, Vec3};
use blockforge_voxel::{Rgba, VoxelMesh};

/// One placed block. `colour` is the source voxel colour, not the block's.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub position: Vec3,
    pub name: String,
    pub colour: Rgba,
}

impl Block {
    pub fn new(position: [i32; 3], name: impl Into<String>, colour: Rgba) -> Self {
        Self {
            position: Vec3::from_ivec(position),
            name: name.into(),
            colour,
        }
    }

    /// Integer grid position.
    #[inline]
    pub fn grid_pos(&self) -> [i32; 3] {
        let p = self.position;
        [p.x.round() as i32, p.y.round() as i32, p.z.round() as i32]
    }
}

#[derive(Clone, Debug, Default)]
pub struct BlockMesh {
    blocks: Vec<Block>,
    names: BTreeSet<String>,
    bounds: Aabb,
}

impl BlockMesh {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            blocks: Vec::new(),
            names: BTreeSet::new(),
            bounds,
        }
    }

    /// Empty mesh carrying the bounds of the voxels it will be built from.
    pub fn for_voxels(voxels: &VoxelMesh) -> Self {
        Self::new(voxels.bounds())
    }

    pub fn add_block(&mut self, block: Block) {
        if !self.names.contains(&block.name) {
            self.names.insert(block.name.clone());
        }
        self.blocks.push(block);
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Distinct block names, sorted.
    pub fn palette(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}
