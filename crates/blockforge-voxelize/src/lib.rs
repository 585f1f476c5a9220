//! Textured triangle mesh to coloured voxels.
#![forbid(unsafe_code)]

pub mod kdtree;
pub mod mesh;
mod raster;
pub mod texture;
pub mod voxelizer;

pub use kdtree::KdTree;
pub use mesh::TexturedMesh;
pub use texture::Texture;
pub use voxelizer::{BasicGridVoxelizer, Voxelizer};
