use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::flags::TileFlags;
use super::table::{TileFlagTable, WallRanges};

// Top-level tile flags config file
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TilesConfig {
    #[serde(default, rename = "tile")]
    pub tiles: Vec<TileDef>,
    // Inclusive [start, end] pairs of wall terrain tile ids.
    #[serde(default)]
    pub wall_ranges: Vec<[u16; 2]>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TileDef {
    pub id: u16,
    #[serde(default)]
    pub name: Option<String>,
    // A raw mask replaces every named attribute below.
    #[serde(default)]
    pub raw: Option<u8>,
    #[serde(default)]
    pub light: Option<u8>,
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub window: Option<bool>,
    #[serde(default)]
    pub floor: Option<bool>,
    #[serde(default)]
    pub background: Option<bool>,
    #[serde(default)]
    pub double_height: Option<bool>,
    #[serde(default)]
    pub double_width: Option<bool>,
}

impl TileDef {
    pub fn flags(&self) -> TileFlags {
        if let Some(raw) = self.raw {
            return TileFlags::from_bits_retain(raw);
        }
        let mut f = TileFlags::empty();
        let named = [
            (self.opaque, TileFlags::OPAQUE),
            (self.window, TileFlags::WINDOW),
            (self.floor, TileFlags::FLOOR),
            (self.background, TileFlags::BACKGROUND),
            (self.double_height, TileFlags::DOUBLE_HEIGHT),
            (self.double_width, TileFlags::DOUBLE_WIDTH),
        ];
        for (on, bit) in named {
            if on.unwrap_or(false) {
                f |= bit;
            }
        }
        f.with_light(self.light.unwrap_or(0))
    }
}

/// Flag table plus wall classification, loaded together.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    pub flags: TileFlagTable,
    pub walls: WallRanges,
    pub by_name: HashMap<String, u16>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_by_name(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    pub fn from_config(cfg: TilesConfig) -> Self {
        let mut set = TileSet::new();
        for def in cfg.tiles.iter() {
            // Later definitions of the same id win.
            set.flags.set(def.id, def.flags());
            if let Some(name) = &def.name {
                set.by_name.insert(name.clone(), def.id);
            }
        }
        for [start, end] in cfg.wall_ranges {
            set.walls.push(start, end);
        }
        set
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TilesConfig = toml::from_str(toml_str)?;
        Ok(Self::from_config(cfg))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
