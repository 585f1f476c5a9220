//! Voxel containers: colours, the sparse coloured mesh, dense grids and face masks.
#![forbid(unsafe_code)]

pub mod face;
pub mod grid;
pub mod mesh;
pub mod types;
pub mod visibility;

pub use face::{Face, FaceMask};
pub use grid::{Grid3, SolidGrid, VisibilityGrid};
pub use mesh::VoxelMesh;
pub use types::Rgba;
pub use visibility::compute_face_visibility;
