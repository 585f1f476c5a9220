//! Sponge schematic (version 2) documents: building one from a block mesh,
//! writing it as gzip-compressed NBT, and reading it back.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use blockforge_blocks::BlockMesh;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::varint::{VarIntError, decode_varints, encode_varints, to_signed_bytes};

pub const SCHEMATIC_VERSION: i32 = 2;
/// Minecraft 1.20.1.
pub const DEFAULT_DATA_VERSION: i32 = 3953;
pub const AIR: &str = "minecraft:air";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("block mesh is empty; nothing to export")]
    EmptyBlockMesh,
    #[error("schematic {axis} of {size} blocks exceeds {max}", max = u16::MAX)]
    TooLarge { axis: &'static str, size: i64 },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("gzip stream: {0}")]
    Gzip(#[source] std::io::Error),
    #[error("nbt: {0}")]
    Nbt(#[from] fastnbt::error::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("block data: {0}")]
    BlockData(#[from] VarIntError),
}

impl ExportError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Root compound of a Sponge v2 schematic, as read back from disk.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SpongeSchematic {
    pub version: i32,
    pub data_version: i32,
    pub width: i16,
    pub height: i16,
    pub length: i16,
    pub palette_max: i32,
    pub palette: IndexMap<String, i32>,
    pub block_data: fastnbt::ByteArray,
    #[serde(default)]
    pub entities: Vec<fastnbt::Value>,
    #[serde(default)]
    pub block_entities: Vec<fastnbt::Value>,
    #[serde(default = "zero_offset")]
    pub offset: Vec<i32>,
}

/// Leading fields of the root compound, in on-disk order. The list-valued
/// tail is written by hand so empty lists keep their element type.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SchematicHead<'a> {
    version: i32,
    data_version: i32,
    width: i16,
    height: i16,
    length: i16,
    palette_max: i32,
    palette: &'a IndexMap<String, i32>,
    block_data: &'a fastnbt::ByteArray,
}

const TAG_END: u8 = 0;
const TAG_INT: u8 = 3;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;

fn zero_offset() -> Vec<i32> {
    vec![0, 0, 0]
}

fn put_list_header(out: &mut Vec<u8>, name: &str, element: u8, len: usize) {
    out.push(TAG_LIST);
    out.extend_from_slice(&(name.len() as u16).to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    out.push(element);
    out.extend_from_slice(&(len as i32).to_be_bytes());
}

/// TAG_List of compounds; element type stays Compound when `items` is empty.
fn put_compound_list(
    out: &mut Vec<u8>,
    name: &str,
    items: &[fastnbt::Value],
) -> Result<(), ExportError> {
    put_list_header(out, name, TAG_COMPOUND, items.len());
    for item in items {
        // An unnamed root compound: tag byte and empty name, then the payload.
        let nbt = fastnbt::to_bytes(item)?;
        out.extend_from_slice(nbt.get(3..).unwrap_or_default());
    }
    Ok(())
}

impl SpongeSchematic {
    /// `(width, height, length)`; shorts are read back as unsigned.
    pub fn dims(&self) -> (usize, usize, usize) {
        (
            self.width as u16 as usize,
            self.height as u16 as usize,
            self.length as u16 as usize,
        )
    }

    /// Palette ids in Y,Z,X order.
    pub fn decode_block_ids(&self) -> Result<Vec<u32>, VarIntError> {
        decode_varints(&self.block_data)
    }

    /// Palette names keyed by id. Negative ids cannot occur in block data.
    fn names_by_id(&self) -> HashMap<u32, &str> {
        let mut names = HashMap::with_capacity(self.palette.len());
        for (name, &id) in &self.palette {
            match u32::try_from(id) {
                Ok(id) => {
                    names.insert(id, name.as_str());
                }
                Err(_) => log::warn!("palette entry '{}' has negative id {}", name, id),
            }
        }
        names
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.palette
            .iter()
            .find(|(_, v)| i64::from(**v) == i64::from(id))
            .map(|(k, _)| k.as_str())
    }

    /// Block name at local `(x, y, z)` given ids from
    /// [`SpongeSchematic::decode_block_ids`]; `None` outside the volume or for
    /// ids missing from the palette.
    pub fn block_name_at(&self, ids: &[u32], x: usize, y: usize, z: usize) -> Option<&str> {
        let (w, h, l) = self.dims();
        if x >= w || y >= h || z >= l {
            return None;
        }
        ids.get((y * l + z) * w + x)
            .and_then(|&id| self.name_of(id))
    }

    /// Occurrences of every palette entry in the volume, in palette order.
    pub fn block_counts(&self) -> Result<IndexMap<String, usize>, VarIntError> {
        let names = self.names_by_id();
        let mut counts: IndexMap<String, usize> =
            self.palette.keys().map(|k| (k.clone(), 0)).collect();
        for id in self.decode_block_ids()? {
            let Some(&name) = names.get(&id) else {
                continue;
            };
            if let Some(n) = counts.get_mut(name) {
                *n += 1;
            }
        }
        Ok(counts)
    }

    /// Uncompressed NBT of the whole document.
    pub fn to_nbt_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let head = SchematicHead {
            version: self.version,
            data_version: self.data_version,
            width: self.width,
            height: self.height,
            length: self.length,
            palette_max: self.palette_max,
            palette: &self.palette,
            block_data: &self.block_data,
        };
        let mut nbt = fastnbt::to_bytes(&head)?;
        // Reopen the root compound to append the tail.
        if nbt.last() == Some(&TAG_END) {
            nbt.pop();
        }
        put_compound_list(&mut nbt, "Entities", &self.entities)?;
        put_compound_list(&mut nbt, "BlockEntities", &self.block_entities)?;
        put_list_header(&mut nbt, "Offset", TAG_INT, self.offset.len());
        for v in &self.offset {
            nbt.extend_from_slice(&v.to_be_bytes());
        }
        nbt.push(TAG_END);
        Ok(nbt)
    }

    pub fn to_gzip_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let nbt = self.to_nbt_bytes()?;
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&nbt)
            .map_err(ExportError::Gzip)?;
        enc.finish()
            .map_err(ExportError::Gzip)
    }

    pub fn from_gzip_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        let mut nbt = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut nbt)
            .map_err(ExportError::Gzip)?;
        Ok(fastnbt::from_bytes(&nbt)?)
    }

    /// Encodes fully in memory first; nothing is created at `path` when
    /// encoding fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let bytes = self.to_gzip_bytes()?;
        fs::write(path, bytes).map_err(|e| ExportError::io(path, e))
    }
}

pub fn read_schematic(path: impl AsRef<Path>) -> Result<SpongeSchematic, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let mut nbt = Vec::new();
    GzDecoder::new(BufReader::new(file))
        .read_to_end(&mut nbt)
        .map_err(|e| ExportError::io(path, e))?;
    Ok(fastnbt::from_bytes(&nbt)?)
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub data_version: i32,
    /// Palette entry used for unoccupied cells.
    pub air: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            data_version: DEFAULT_DATA_VERSION,
            air: AIR.to_string(),
        }
    }
}

/// Dense palette-indexed volume built from a [`BlockMesh`].
#[derive(Clone, Debug)]
pub struct SchematicExporter {
    width: u16,
    height: u16,
    length: u16,
    palette: IndexMap<String, i32>,
    /// Palette ids, Y,Z,X row-major.
    ids: Vec<u32>,
    data_version: i32,
}

impl SchematicExporter {
    pub fn new(mesh: &BlockMesh) -> Result<Self, ExportError> {
        Self::with_options(mesh, &ExportOptions::default())
    }

    pub fn with_options(mesh: &BlockMesh, opts: &ExportOptions) -> Result<Self, ExportError> {
        if mesh.is_empty() {
            return Err(ExportError::EmptyBlockMesh);
        }
        let bounds = mesh.bounds();
        let min = [
            bounds.min.x.round() as i64,
            bounds.min.y.round() as i64,
            bounds.min.z.round() as i64,
        ];
        let max = [
            bounds.max.x.round() as i64,
            bounds.max.y.round() as i64,
            bounds.max.z.round() as i64,
        ];
        let dim = |axis: &'static str, a: usize| -> Result<u16, ExportError> {
            let size = (max[a] - min[a] + 1).max(1);
            u16::try_from(size).map_err(|_| ExportError::TooLarge { axis, size })
        };
        let (width, height, length) = (dim("width", 0)?, dim("height", 1)?, dim("length", 2)?);

        let mut palette: IndexMap<String, i32> = IndexMap::new();
        for b in mesh.blocks() {
            if !palette.contains_key(&b.name) {
                let id = palette.len() as i32;
                palette.insert(b.name.clone(), id);
            }
        }
        let air_id = match palette.get(&opts.air) {
            Some(&id) => id,
            None => {
                let id = palette.len() as i32;
                palette.insert(opts.air.clone(), id);
                id
            }
        };

        let (w, h, l) = (width as usize, height as usize, length as usize);
        let mut ids = vec![air_id as u32; w * h * l];
        let mut outside = 0usize;
        for b in mesh.blocks() {
            let p = b.grid_pos();
            let lx = p[0] as i64 - min[0];
            let ly = p[1] as i64 - min[1];
            let lz = p[2] as i64 - min[2];
            let inside = (0..w as i64).contains(&lx)
                && (0..h as i64).contains(&ly)
                && (0..l as i64).contains(&lz);
            if !inside {
                outside += 1;
                continue;
            }
            let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
            if let Some(&id) = palette.get(&b.name) {
                ids[(ly * l + lz) * w + lx] = id as u32;
            }
        }
        if outside > 0 {
            log::warn!("{} blocks fall outside the schematic volume", outside);
        }

        Ok(Self {
            width,
            height,
            length,
            palette,
            ids,
            data_version: opts.data_version,
        })
    }

    /// `(width, height, length)`.
    #[inline]
    pub fn dims(&self) -> (u16, u16, u16) {
        (self.width, self.height, self.length)
    }

    #[inline]
    pub fn palette(&self) -> &IndexMap<String, i32> {
        &self.palette
    }

    #[inline]
    pub fn block_ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn to_schematic(&self) -> SpongeSchematic {
        let data = to_signed_bytes(encode_varints(self.ids.iter().copied()));
        SpongeSchematic {
            version: SCHEMATIC_VERSION,
            data_version: self.data_version,
            width: self.width as i16,
            height: self.height as i16,
            length: self.length as i16,
            palette_max: self.palette.len() as i32,
            palette: self.palette.clone(),
            block_data: fastnbt::ByteArray::new(data),
            entities: Vec::new(),
            block_entities: Vec::new(),
            offset: zero_offset(),
        }
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        log::info!(
            "writing {}x{}x{} schematic with {} palette entries to {}",
            self.width,
            self.height,
            self.length,
            self.palette.len(),
            path.display()
        );
        self.to_schematic().write_to(path)
    }
}
