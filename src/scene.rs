use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use umbra_compose::{MagicLens, ObscurityGlyphs};
use umbra_lighting::AmbientLightInput;
use umbra_tiles::{TileSet, TilesConfig};
use umbra_world::{DoorStates, ObjectStore, RenderableObject, TileMap, ViewRect};

const DEFAULT_VIEW: usize = 11;
const DEFAULT_LENS_TYPE: u16 = 0x18a;
const DEFAULT_LENS_TILE: u16 = 0x1ba;
const DEFAULT_GLYPH_BASE: u16 = 0x1e0;
const DEFAULT_GLYPH_THRESHOLD: i32 = 2;

// Top-level scene file
#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
    pub view: ViewConfig,
    #[serde(default)]
    pub ambient: u8,
    pub map: MapConfig,
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectDef>,
    // Actor positions checked for occlusion parity.
    #[serde(default)]
    pub actors: Vec<[i32; 2]>,
    // Tile flags file, relative to the scene file.
    #[serde(default)]
    pub tiles_path: Option<PathBuf>,
    // Inline tile flags; ignored when `tiles_path` is set.
    #[serde(default)]
    pub tiles: Option<TilesConfig>,
    #[serde(default)]
    pub lens: Option<LensConfig>,
    #[serde(default)]
    pub obscurity: Option<ObscurityConfig>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ViewConfig {
    // Viewer position; the viewport is centered on it.
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
    #[serde(default = "default_view_dim")]
    pub width: usize,
    #[serde(default = "default_view_dim")]
    pub height: usize,
}

fn default_view_dim() -> usize {
    DEFAULT_VIEW
}

#[derive(Deserialize, Debug, Clone)]
pub struct MapConfig {
    pub origin: [i32; 2],
    #[serde(default)]
    pub fill: u16,
    #[serde(default)]
    pub rows: Vec<Vec<u16>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ObjectDef {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
    pub tile: u16,
    #[serde(default, rename = "type")]
    pub obj_type: u16,
    #[serde(default)]
    pub base_tile: Option<u16>,
    #[serde(default)]
    pub frame: u16,
    #[serde(default)]
    pub order: u32,
    // [area, index] position in the source stream.
    #[serde(default)]
    pub source: Option<[u32; 2]>,
    #[serde(default)]
    pub hidden: bool,
    // Closeable doors only: start toggled away from the stored frame.
    #[serde(default)]
    pub toggled: bool,
}

impl ObjectDef {
    fn to_object(&self) -> RenderableObject {
        let mut o = RenderableObject::new(self.x, self.y, self.z, self.tile)
            .with_type(self.obj_type)
            .with_order(self.order)
            .with_frame(self.base_tile.unwrap_or(self.tile), self.frame);
        if let Some([area, index]) = self.source {
            o = o.with_source(area, index);
        }
        if self.hidden {
            o = o.hidden();
        }
        o
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct LensConfig {
    #[serde(rename = "type")]
    pub obj_type: u16,
    pub base_tile: u16,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ObscurityConfig {
    pub glyph_base: u16,
    #[serde(default = "default_glyph_threshold")]
    pub threshold: i32,
}

fn default_glyph_threshold() -> i32 {
    DEFAULT_GLYPH_THRESHOLD
}

/// Everything one snapshot needs, built from a scene file.
pub struct Scene {
    pub view: ViewRect,
    pub ambient: AmbientLightInput,
    pub map: TileMap,
    pub objects: ObjectStore,
    pub doors: DoorStates,
    pub tiles: TileSet,
    pub actors: Vec<(i32, i32)>,
    pub lens: MagicLens,
    pub obscurity: ObscurityGlyphs,
}

impl Scene {
    /// `base_dir` resolves a relative `tiles_path`.
    pub fn from_config(cfg: SceneConfig, base_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let v = cfg.view;
        if v.width == 0 || v.height == 0 {
            return Err(format!("view must be at least 1x1, got {}x{}", v.width, v.height).into());
        }
        let view = ViewRect::centered(v.x, v.y, v.z, v.width, v.height);
        let map = TileMap::from_rows(cfg.map.origin[0], cfg.map.origin[1], v.z, cfg.map.fill, &cfg.map.rows);

        let tiles = match (&cfg.tiles_path, cfg.tiles) {
            (Some(path), _) => TileSet::load_from_path(base_dir.join(path))?,
            (None, Some(inline)) => TileSet::from_config(inline),
            (None, None) => TileSet::new(),
        };

        let mut objects = ObjectStore::new();
        let mut doors = DoorStates::new();
        for def in &cfg.objects {
            let obj = def.to_object();
            if def.toggled && !doors.toggle(&obj) {
                log::warn!(
                    "object at ({}, {}) type {:#x} is not a closeable door; ignoring toggled",
                    def.x,
                    def.y,
                    def.obj_type
                );
            }
            objects.push(obj);
        }

        let lens = cfg.lens.map_or(
            MagicLens {
                obj_type: DEFAULT_LENS_TYPE,
                base_tile: DEFAULT_LENS_TILE,
            },
            |l| MagicLens {
                obj_type: l.obj_type,
                base_tile: l.base_tile,
            },
        );
        let obscurity = cfg.obscurity.map_or(
            ObscurityGlyphs {
                glyph_base: DEFAULT_GLYPH_BASE,
                threshold: DEFAULT_GLYPH_THRESHOLD,
            },
            |o| ObscurityGlyphs {
                glyph_base: o.glyph_base,
                threshold: o.threshold,
            },
        );

        log::info!(
            "scene: view {}x{} at ({}, {}, {}), {} objects, {} actors",
            view.width,
            view.height,
            v.x,
            v.y,
            v.z,
            objects.len(),
            cfg.actors.len()
        );

        Ok(Self {
            view,
            ambient: AmbientLightInput::new(cfg.ambient),
            map,
            objects,
            doors,
            tiles,
            actors: cfg.actors.iter().map(|&[x, y]| (x, y)).collect(),
            lens,
            obscurity,
        })
    }

    pub fn from_toml_str(toml_str: &str, base_dir: &Path) -> Result<Self, Box<dyn Error>> {
        let cfg: SceneConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg, base_dir)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&s, base_dir)
    }

    /// Drops the precomputed window stream so consumers scan per cell.
    pub fn disable_stream(&mut self) {
        let objects = std::mem::take(&mut self.objects);
        self.objects = objects.without_stream();
    }
}
