//! Block atlas, nearest-colour block selection and the placed-block mesh.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod mapper;
pub mod types;

pub use atlas::{Atlas, AtlasBlock, AtlasError, FaceData};
pub use mapper::{
    BlockMapper, FALLBACK_BLOCK, SkippedVoxel, contextual_colour, map_voxels_to_blocks,
    map_voxels_with_report,
};
pub use types::{Block, BlockMesh};
