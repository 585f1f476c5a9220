//! File formats: Sponge schematics, OBJ/texture input and JSON previews.
#![forbid(unsafe_code)]

pub mod mesh_io;
pub mod preview;
pub mod schem;
pub mod varint;

pub use mesh_io::{MeshLoadError, load_obj_mesh, load_texture};
pub use preview::{write_block_names_preview, write_voxel_preview};
pub use schem::{
    AIR, DEFAULT_DATA_VERSION, ExportError, ExportOptions, SchematicExporter, SpongeSchematic,
    read_schematic,
};
pub use varint::{VarIntError, decode_varints, encode_varints, to_signed_bytes};
