use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Contents of `blockforge.toml`. Every section and key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub voxelize: VoxelizeSection,
    pub atlas: AtlasSection,
    pub export: ExportSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoxelizeSection {
    /// Voxels along the longest mesh axis.
    pub max_blocks: u32,
    pub fill: bool,
}

impl Default for VoxelizeSection {
    fn default() -> Self {
        Self {
            max_blocks: 128,
            fill: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasSection {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSection {
    pub data_version: i32,
    pub air: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            data_version: blockforge_io::DEFAULT_DATA_VERSION,
            air: blockforge_io::AIR.to_string(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<PipelineConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: PipelineConfig = toml::from_str(&s)?;
    Ok(cfg)
}
