use std::collections::HashMap;

use serde::Deserialize;

/// Colour channels in `[0, 1]`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ColourDef {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BlockDef {
    pub name: String,
    pub colour: ColourDef,
    /// Face name (`"up"`, `"north"`, ...) to texture key.
    #[serde(default)]
    pub faces: HashMap<String, String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TextureDef {
    pub colour: ColourDef,
    #[serde(default)]
    pub std: f64,
}

/// On-disk atlas document. `blocks` order is significant.
#[derive(Deserialize, Clone, Debug)]
pub struct AtlasConfig {
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub textures: HashMap<String, TextureDef>,
}
