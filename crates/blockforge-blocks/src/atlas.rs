use std::fs;
use std::path::{Path, PathBuf};

use blockforge_voxel::{Face, Rgba};
use hashbrown::HashMap;
use thiserror::Error;

use crate::config::{AtlasConfig, ColourDef};

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("cannot read atlas {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed atlas: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Average colour of one face texture and its spread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceData {
    pub colour: Rgba,
    pub std: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtlasBlock {
    pub name: String,
    /// Whole-block average, used when no exposed face has data.
    pub colour: Rgba,
    pub faces: HashMap<Face, FaceData>,
}

impl AtlasBlock {
    #[inline]
    pub fn face(&self, face: Face) -> Option<&FaceData> {
        self.faces.get(&face)
    }
}

/// Candidate blocks in file order.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    blocks: Vec<AtlasBlock>,
    by_name: HashMap<String, usize>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AtlasError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = Self::from_json_str(&text)?;
        log::info!("loaded atlas {} with {} blocks", path.display(), atlas.len());
        Ok(atlas)
    }

    pub fn from_json_str(s: &str) -> Result<Self, AtlasError> {
        let cfg: AtlasConfig = serde_json::from_str(s)?;
        Ok(Self::from_config(cfg))
    }

    pub fn from_config(cfg: AtlasConfig) -> Self {
        let mut atlas = Atlas::new();
        for def in cfg.blocks {
            let mut faces = HashMap::new();
            for (face_name, key) in &def.faces {
                let Some(face) = Face::from_name(face_name) else {
                    log::debug!("{}: ignoring unknown face '{}'", def.name, face_name);
                    continue;
                };
                if let Some(tex) = cfg.textures.get(key) {
                    faces.insert(
                        face,
                        FaceData {
                            colour: unit_to_rgba(tex.colour),
                            std: tex.std,
                        },
                    );
                }
            }
            atlas.insert(AtlasBlock {
                name: def.name,
                colour: unit_to_rgba(def.colour),
                faces,
            });
        }
        atlas
    }

    /// Appends `block`; a repeated name replaces the earlier entry in place.
    pub fn insert(&mut self, block: AtlasBlock) {
        if let Some(&i) = self.by_name.get(&block.name) {
            log::warn!("duplicate atlas block '{}'; later entry wins", block.name);
            self.blocks[i] = block;
            return;
        }
        self.by_name.insert(block.name.clone(), self.blocks.len());
        self.blocks.push(block);
    }

    pub fn get(&self, name: &str) -> Option<&AtlasBlock> {
        self.by_name.get(name).and_then(|&i| self.blocks.get(i))
    }

    #[inline]
    pub fn blocks(&self) -> &[AtlasBlock] {
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
}

#[inline]
fn unit_to_rgba(c: ColourDef) -> Rgba {
    Rgba::rgb(
        (c.r * 255.0) as u8,
        (c.g * 255.0) as u8,
        (c.b * 255.0) as u8,
    )
}
